//! Uniform response envelope used by outer surfaces.
//!
//! Façade results are reported as `{ code, message, data? }` where `code == 0`
//! means success. The envelope carries no transport detail from upstream.

use serde::{Deserialize, Serialize};

/// Envelope code reported for successful operations.
pub const SUCCESS_CODE: i32 = 0;
/// Envelope code reported for failed operations.
pub const FAILURE_CODE: i32 = 1;

/// Response envelope wrapping an optional payload.
///
/// # Examples
/// ```
/// use tshock_gateway::domain::ResponseMessage;
///
/// let ok = ResponseMessage::success(vec!["line".to_owned()]);
/// assert!(ok.is_success());
///
/// let failed = ResponseMessage::<()>::failure("broadcast rejected");
/// assert_eq!(failed.code, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage<T> {
    /// `0` on success, non-zero otherwise.
    pub code: i32,
    /// Short human-readable outcome.
    pub message: String,
    /// Operation payload, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ResponseMessage<T> {
    /// Successful outcome carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: "success".to_owned(),
            data: Some(data),
        }
    }

    /// Failed outcome without a payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: FAILURE_CODE,
            message: message.into(),
            data: None,
        }
    }

    /// Whether `code` signals success.
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl ResponseMessage<()> {
    /// Envelope for operations that only report success or failure.
    pub fn from_flag(succeeded: bool, failure_message: impl Into<String>) -> Self {
        if succeeded {
            Self {
                code: SUCCESS_CODE,
                message: "success".to_owned(),
                data: None,
            }
        } else {
            Self::failure(failure_message)
        }
    }
}
