use crate::infrastructure::encoding::error::ApiError;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Envelope wrapped around every response of the encoding API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub request_id: Option<String>,
    pub status: ResponseStatus,
    #[serde(default = "Option::default")]
    pub data: Option<ResponseData<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData<T> {
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub developer_message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the envelope, turning error envelopes and non-2xx statuses into `ApiError::Status`.
    pub fn into_result(self, http_status: u16) -> Result<Option<T>, ApiError> {
        let is_success = (200..300).contains(&http_status);
        if is_success && self.status == ResponseStatus::Success {
            return Ok(self.data.and_then(|d| d.result));
        }

        let (code, message) = match self.data {
            Some(data) => {
                let message = data
                    .developer_message
                    .or(data.message)
                    .unwrap_or_else(|| "no error message provided".to_string());
                (data.code, message)
            }
            None => (None, "no error message provided".to_string()),
        };

        Err(ApiError::Status {
            status: http_status,
            code,
            message,
            request_id: self.request_id,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdResult {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse<T> {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfigTypeResult {
    #[serde(rename = "type")]
    pub kind: String,
}
