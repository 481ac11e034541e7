//! Scripted HTTP dispatch doubles shared by the unit tests.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::dispatch::{DispatchError, HttpDispatch, HttpReply};

/// One scripted exchange, consumed in call order.
pub enum Script {
    Reply { status: u16, body: String },
    Error(String),
    /// Never completes within any per-attempt budget.
    Hang,
}

impl Script {
    pub fn ok(body: impl Into<String>) -> Self {
        Script::Reply {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Script::Reply {
            status,
            body: body.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Script::Error(message.into())
    }
}

/// What a dispatch call looked like.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Json {
        url: String,
        body: Option<serde_json::Value>,
    },
    Put {
        url: String,
        content_type: String,
        len: usize,
    },
}

/// Dispatch double that replays a fixed script and records every call.
#[derive(Default)]
pub struct ScriptedDispatch {
    script: Mutex<VecDeque<Script>>,
    calls: Mutex<Vec<Recorded>>,
}

impl ScriptedDispatch {
    pub fn new(script: Vec<Script>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn put_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Recorded::Put { .. }))
            .count()
    }

    fn next(&self) -> Script {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("dispatch script exhausted")
    }

    async fn play(&self, entry: Script) -> Result<HttpReply, DispatchError> {
        match entry {
            Script::Reply { status, body } => Ok(HttpReply { status, body }),
            Script::Error(message) => Err(DispatchError(message)),
            Script::Hang => {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                Err(DispatchError("hang elapsed".to_string()))
            }
        }
    }
}

#[async_trait]
impl HttpDispatch for ScriptedDispatch {
    async fn execute_json(
        &self,
        _method: Method,
        url: &str,
        _headers: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<HttpReply, DispatchError> {
        self.calls.lock().unwrap().push(Recorded::Json {
            url: url.to_string(),
            body: body.cloned(),
        });
        let entry = self.next();
        self.play(entry).await
    }

    async fn put_binary(
        &self,
        url: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<HttpReply, DispatchError> {
        self.calls.lock().unwrap().push(Recorded::Put {
            url: url.to_string(),
            content_type: content_type.to_string(),
            len: body.len(),
        });
        let entry = self.next();
        self.play(entry).await
    }
}
