use serde::{Deserialize, Serialize};

/// Body of `POST /urls`.
///
/// `alias` and `expirationDate` are always sent, as `null` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    pub original_url: String,
    pub alias: Option<String>,
    pub expiration_date: Option<String>,
}

impl CreateUrlRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            alias: None,
            expiration_date: None,
        }
    }
}

/// Successful response of `POST /urls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub short_code: String,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
}

/// One created short URL as recorded in the dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlEntry {
    pub short_code: String,
    pub original_url: String,
    pub short_url: Option<String>,
}

impl ShortUrlEntry {
    /// Keeps the URL that was sent rather than whatever the service echoed back.
    pub fn from_response(sent: &CreateUrlRequest, response: CreateUrlResponse) -> Self {
        Self {
            short_code: response.short_code,
            original_url: sent.original_url.clone(),
            short_url: response.short_url,
        }
    }
}
