use thiserror::Error;

/// The only failure the translation layer can produce. It is returned while turning an
/// API Gateway event into a [`crate::ProxyRequest`] and means no request was built.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The event is not valid JSON or a field has the wrong type.
    #[error("invalid API Gateway event: {0}")]
    Json(#[from] serde_json::Error),
    /// `isBase64Encoded` was set, but the body is not standard padded base64.
    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),
}
