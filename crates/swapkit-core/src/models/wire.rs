use serde::Deserialize;

/// Response envelope used by every processing-service endpoint:
/// `{code, data, msg?}` where code 200 or 201 is success.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub code: i64,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.code == 200 || self.code == 201
    }

    /// The server's message, or a caller-supplied fallback.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.msg.as_deref() {
            Some(msg) if !msg.is_empty() => msg,
            _ => fallback,
        }
    }
}

/// Reply shape of the auxiliary worker endpoints: `{code, data, message?}`.
#[derive(Debug, Deserialize)]
pub struct WorkerReply {
    pub code: i64,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}
