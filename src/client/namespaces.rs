use super::DocClient;
use crate::error::Result;
use crate::models::Namespace;

impl DocClient {
    pub async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        let url = self.endpoint(&["namespaces"])?;
        self.http().get_json(&url).await
    }

    pub async fn get_namespace(&self, prefix: &str) -> Result<Namespace> {
        let url = self.endpoint(&["namespaces", prefix])?;
        self.http().get_json(&url).await
    }

    pub async fn create_namespace(&self, namespace: &Namespace) -> Result<Namespace> {
        let url = self.endpoint(&["namespaces"])?;
        self.http().post_json_once(&url, namespace).await
    }

    pub async fn delete_namespace(&self, prefix: &str) -> Result<()> {
        let url = self.endpoint(&["namespaces", prefix])?;
        self.http().delete(&url).await
    }
}
