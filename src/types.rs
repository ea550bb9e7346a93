//! Small shared types
//!
//! JSON aliases used by the models, plus the enums that appear in
//! configuration files.

use serde::{Deserialize, Serialize};

pub type JsonValue = serde_json::Value;

/// Free-form property bag on nodes and schemas
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Verb for configurable requests such as a session login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    #[default]
    POST,
    PUT,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => Self::GET,
            Method::POST => Self::POST,
            Method::PUT => Self::PUT,
        }
    }
}

/// Growth of the delay between retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    Constant,
    Linear,
    #[default]
    Exponential,
}
