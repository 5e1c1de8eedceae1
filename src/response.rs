//! JSON envelope returned by the gateway routes.

use serde::Serialize;

/// `{ "message": ..., "success": ..., "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub success: bool,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            message: "SUCCESS".to_string(),
            success: true,
            data: Some(data),
        }
    }

    /// Failure envelope naming the call that failed. Details stay in the logs.
    pub fn failure(call: &str) -> Self {
        Self {
            message: format!("System call [{}] was failed.", call),
            success: false,
            data: None,
        }
    }
}
