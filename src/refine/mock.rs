//! Scripted oracle for tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{OracleError, OracleResult};
use super::oracle::QueryOracle;
use super::types::{AlternativeQuery, OracleResponse, RefinementRequest};

enum Behavior {
    /// Pops one response per call; empty once drained.
    Scripted(Mutex<VecDeque<Vec<AlternativeQuery>>>),
    /// Same response on every call.
    Repeating(Vec<AlternativeQuery>),
    Failing(String),
}

pub struct MockQueryOracle {
    behavior: Behavior,
    delay: Option<Duration>,
    requests: Mutex<Vec<RefinementRequest>>,
}

impl MockQueryOracle {
    pub fn scripted(responses: Vec<Vec<AlternativeQuery>>) -> Self {
        Self::with_behavior(Behavior::Scripted(Mutex::new(responses.into())))
    }

    pub fn repeating(alternatives: Vec<AlternativeQuery>) -> Self {
        Self::with_behavior(Behavior::Repeating(alternatives))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Failing(message.into()))
    }

    pub fn empty() -> Self {
        Self::scripted(Vec::new())
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Sleeps before answering (use with a paused tokio clock).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<RefinementRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl QueryOracle for MockQueryOracle {
    async fn propose(&self, request: &RefinementRequest) -> OracleResult<OracleResponse> {
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behavior {
            Behavior::Scripted(queue) => Ok(OracleResponse::new(
                queue.lock().pop_front().unwrap_or_default(),
            )),
            Behavior::Repeating(alternatives) => Ok(OracleResponse::new(alternatives.clone())),
            Behavior::Failing(message) => Err(OracleError::Unavailable {
                message: message.clone(),
            }),
        }
    }
}
