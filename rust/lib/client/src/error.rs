/// Client-side failure that never reached a server verdict.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
