//! Payloads of the `pass` exchange, shared by the starter and its clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub const RESULT_CONTINUE: &str = "continue";
pub const RESULT_COMPLETE: &str = "complete";

/// Form body of `POST /pass`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct PasswordForm {
    /// Hex encoded PKCS#1 v1.5 ciphertext of the password
    #[serde(default)]
    pub password: String,
}

/// JSON answer of `POST /pass`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerResult {
    /// `continue` or `complete`
    pub result: String,
}

impl ServerResult {
    #[must_use]
    pub fn new(code: &ResultCode) -> Self {
        Self {
            result: code.to_string(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ResultCode {
        ResultCode::from(self.result.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultCode {
    /// Password rejected or not yet final, the client may submit again
    Continue,
    /// Password accepted, the flow is over
    Complete,
    Other(String),
}

impl From<&str> for ResultCode {
    fn from(value: &str) -> Self {
        match value {
            RESULT_CONTINUE => Self::Continue,
            RESULT_COMPLETE => Self::Complete,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str(RESULT_CONTINUE),
            Self::Complete => f.write_str(RESULT_COMPLETE),
            Self::Other(value) => f.write_str(value),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_result_codes() {
        assert_eq!(ResultCode::from("continue"), ResultCode::Continue);
        assert_eq!(ResultCode::from("complete"), ResultCode::Complete);
        assert_eq!(
            ResultCode::from("Complete"),
            ResultCode::Other("Complete".to_string())
        );
    }

    #[test]
    fn test_server_result_json() {
        let json = serde_json::to_string(&ServerResult::new(&ResultCode::Complete)).unwrap();
        assert_eq!(json, r#"{"result":"complete"}"#);

        let parsed: ServerResult = serde_json::from_str(r#"{"result":"retry"}"#).unwrap();
        assert_eq!(parsed.code(), ResultCode::Other("retry".to_string()));
    }
}
