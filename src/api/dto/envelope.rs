/*
 * Responsibility
 * - Common response envelope: { success, message, code?, data, timestamp }
 */
use chrono::Local;
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    pub data: Option<T>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
            data: Some(data),
            timestamp: now(),
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: Some(code),
            data: None,
            timestamp: now(),
        }
    }
}

fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
