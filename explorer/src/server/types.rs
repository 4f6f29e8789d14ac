use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// Standard envelope of every API response.
///
/// ```
/// use explorer::server::types::ApiResponse;
/// let response = ApiResponse::error("invalid address".to_string());
/// assert!(!response.success);
/// assert_eq!(response.message, Some("invalid address".to_string()));
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details, or a note on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self { success: false, data: None, message: Some(message) }
    }
}

impl<T> ApiResponse<T> {
    pub fn success_with_data(data: T, message: Option<String>) -> Self {
        Self { success: true, data: Some(data), message }
    }
}

/// Query of `GET /gettx`. Kept as a raw string so a malformed hash is a 400, not a rejection.
#[derive(Debug, Deserialize)]
pub struct HashQuery {
    pub hash: Option<String>,
}

/// Query of `GET /gettxs`
#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

pub(crate) fn parse_hash(raw: &str) -> Option<B256> {
    raw.parse().ok()
}

pub(crate) fn parse_address(raw: &str) -> Option<Address> {
    raw.parse().ok()
}
