// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 18;

/// Raw request body for `POST /chat`. Both fields are optional at the serde
/// layer so missing or oddly-typed values reach [`ChatRequest::validate`] and
/// get a proper 400 instead of a deserializer rejection.
#[derive(Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub age: Option<Value>,
}

/// A request that passed validation: trimmed non-empty message, age in range.
#[derive(Debug)]
pub struct ValidChat {
    pub message: String,
    pub age: u8,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

impl ChatRequest {
    pub fn validate(self) -> Result<ValidChat, AppError> {
        let message = self.message.as_deref().unwrap_or("").trim().to_string();
        if message.is_empty() {
            return Err(AppError::Validation("No message provided.".to_string()));
        }

        let age = parse_age(self.age.as_ref())?;
        Ok(ValidChat { message, age })
    }
}

// Accepts a JSON integer or a numeric string ("8"); anything else is invalid.
fn parse_age(raw: Option<&Value>) -> Result<u8, AppError> {
    let age = match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::Validation("Invalid age provided.".to_string()))?;

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(AppError::Validation(
            "Please enter an age between 1 and 18.".to_string(),
        ));
    }

    Ok(age as u8)
}
