use super::DocClient;
use crate::error::Result;
use crate::http::RequestConfig;
use crate::models::{NewNode, Node, NodeUpdate};
use reqwest::Method;
use serde_json::json;

impl DocClient {
    /// Fetch a node by id
    pub async fn get_node(&self, id: &str) -> Result<Node> {
        let url = self.endpoint(&["nodes", id])?;
        self.http().get_json(&url).await
    }

    /// Fetch a node by its repository path
    pub async fn get_node_by_path(&self, path: &str) -> Result<Node> {
        let url = self.endpoint(&["nodes"])?;
        self.http()
            .request_json(Method::GET, &url, RequestConfig::new().query("path", path))
            .await
    }

    /// Direct children of a node
    pub async fn get_children(&self, id: &str) -> Result<Vec<Node>> {
        let url = self.endpoint(&["nodes", id, "children"])?;
        self.http().get_json(&url).await
    }

    pub async fn create_node(&self, node: &NewNode) -> Result<Node> {
        let url = self.endpoint(&["nodes"])?;
        self.http().post_json_once(&url, node).await
    }

    pub async fn update_node(&self, id: &str, update: &NodeUpdate) -> Result<Node> {
        let url = self.endpoint(&["nodes", id])?;
        self.http().put_json(&url, update).await
    }

    /// Re-parent a node
    pub async fn move_node(&self, id: &str, new_parent_id: &str) -> Result<Node> {
        let url = self.endpoint(&["nodes", id, "move"])?;
        self.http()
            .post_json_once(&url, &json!({ "parent_id": new_parent_id }))
            .await
    }

    pub async fn delete_node(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["nodes", id])?;
        self.http().delete(&url).await
    }
}
