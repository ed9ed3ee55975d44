use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::response::{InterpretRequest, InterpreterResponse};

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("Invalid interpreter URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Could not reach the alarm interpreter: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("Alarm interpreter responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Alarm interpreter returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Remote service turning free text into an alarm directive.
#[async_trait]
pub trait AlarmInterpreter: Send + Sync + 'static {
    async fn interpret(&self, text: &str) -> Result<InterpreterResponse, InterpreterError>;
}

pub struct HttpAlarmInterpreter {
    url: Url,
    http_client: reqwest::Client,
}

impl HttpAlarmInterpreter {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, InterpreterError> {
        let url = Url::parse(url).map_err(|source| InterpreterError::InvalidUrl {
            url: url.to_owned(),
            source,
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(InterpreterError::Client)?;

        Ok(Self { url, http_client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl AlarmInterpreter for HttpAlarmInterpreter {
    async fn interpret(&self, text: &str) -> Result<InterpreterResponse, InterpreterError> {
        log::info!("Sending alarm request to interpreter. [url = {}]", self.url);

        let response = self
            .http_client
            .post(self.url.clone())
            .json(&InterpretRequest { text })
            .send()
            .await
            .map_err(InterpreterError::Unreachable)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(InterpreterError::Unreachable)?;

        if !status.is_success() {
            log::warn!("Interpreter returned an error status. [status = {status}]");
            return Err(InterpreterError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
