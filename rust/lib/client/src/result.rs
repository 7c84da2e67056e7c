use crate::error::ApiError;

/// Outcome of a remote call.
///
/// `Error` means the server answered and rejected the request; `Exception`
/// means no usable answer arrived (transport failure, undecodable body).
#[derive(Debug)]
pub enum NetworkResult<T> {
    Success(T),
    Error { message: String, code: Option<u16> },
    Exception(ApiError),
}

impl<T> NetworkResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The payload, discarding any failure.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> NetworkResult<U> {
        match self {
            Self::Success(v) => NetworkResult::Success(f(v)),
            Self::Error { message, code } => NetworkResult::Error { message, code },
            Self::Exception(e) => NetworkResult::Exception(e),
        }
    }

    /// Human-readable failure text, `None` on success.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::Error { message, .. } => Some(message.clone()),
            Self::Exception(e) => Some(e.to_string()),
        }
    }
}

impl<T> From<ApiError> for NetworkResult<T> {
    fn from(e: ApiError) -> Self {
        Self::Exception(e)
    }
}
