//! Scripted in-memory transport for tests and offline demos.

use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(HttpResponse),
    /// Simulates a connection-level failure
    Fail(String),
}

/// Replays queued replies in order and records every request it sees.
///
/// Once the queue is drained, the fallback reply (if any) is returned for
/// every further request; without one the transport fails.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    fallback: Option<Scripted>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answers with the same status and body
    pub fn always(status: u16, body: impl Into<String>) -> Self {
        Self {
            fallback: Some(Scripted::Respond(HttpResponse::new(status, body))),
            ..Self::default()
        }
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Scripted::Respond(HttpResponse::new(status, body)))
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Scripted::Fail(message.into()))
    }

    fn push(self, reply: Scripted) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.clone();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let next = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .or_else(|| self.fallback.clone());

        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message,
            ))),
            None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                format!("no scripted reply for {}", url),
            ))),
        }
    }
}
