use serde::Serialize;
use serde_json::Value;

/// What a command hands back to the command-output channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    /// Display text: multi-line on success, a single line on error
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let ok = CommandResult::ok("done", serde_json::json!({"id": 42}));
        assert_eq!(ok.to_json(), r#"{"success":true,"message":"done","data":{"id":42}}"#);

        let err = CommandResult::err("nope");
        assert_eq!(err.to_json(), r#"{"success":false,"message":"nope"}"#);
    }
}
