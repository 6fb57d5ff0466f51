/// Token and message payloads
///
/// None of these are persisted.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Generic message response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Access token response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
        }
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Decoded token contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(default)]
    pub sub: Option<String>,
}

/// Password reset request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPassword {
    pub token: String,

    #[validate(length(min = 8, max = 40, message = "Password must be 8 to 40 characters"))]
    pub new_password: String,
}
