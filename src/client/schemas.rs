//! Schemas and auxiliary schemas share one resource layout under
//! `/schemas` and `/auxschemas`.

use super::DocClient;
use crate::error::Result;
use crate::models::{AuxSchema, Schema};

const SCHEMAS: &str = "schemas";
const AUX_SCHEMAS: &str = "auxschemas";

impl DocClient {
    // ============================================================================
    // Schemas
    // ============================================================================

    pub async fn list_schemas(&self) -> Result<Vec<Schema>> {
        let url = self.endpoint(&[SCHEMAS])?;
        self.http().get_json(&url).await
    }

    pub async fn get_schema(&self, name: &str) -> Result<Schema> {
        let url = self.endpoint(&[SCHEMAS, name])?;
        self.http().get_json(&url).await
    }

    pub async fn create_schema(&self, schema: &Schema) -> Result<Schema> {
        let url = self.endpoint(&[SCHEMAS])?;
        self.http().post_json_once(&url, schema).await
    }

    pub async fn update_schema(&self, name: &str, schema: &Schema) -> Result<Schema> {
        let url = self.endpoint(&[SCHEMAS, name])?;
        self.http().put_json(&url, schema).await
    }

    pub async fn delete_schema(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&[SCHEMAS, name])?;
        self.http().delete(&url).await
    }

    // ============================================================================
    // Auxiliary schemas
    // ============================================================================

    pub async fn list_aux_schemas(&self) -> Result<Vec<AuxSchema>> {
        let url = self.endpoint(&[AUX_SCHEMAS])?;
        self.http().get_json(&url).await
    }

    pub async fn get_aux_schema(&self, name: &str) -> Result<AuxSchema> {
        let url = self.endpoint(&[AUX_SCHEMAS, name])?;
        self.http().get_json(&url).await
    }

    pub async fn create_aux_schema(&self, schema: &AuxSchema) -> Result<AuxSchema> {
        let url = self.endpoint(&[AUX_SCHEMAS])?;
        self.http().post_json_once(&url, schema).await
    }

    pub async fn update_aux_schema(&self, name: &str, schema: &AuxSchema) -> Result<AuxSchema> {
        let url = self.endpoint(&[AUX_SCHEMAS, name])?;
        self.http().put_json(&url, schema).await
    }

    pub async fn delete_aux_schema(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&[AUX_SCHEMAS, name])?;
        self.http().delete(&url).await
    }
}
