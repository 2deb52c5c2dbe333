use crate::corona::error::RefreshError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where raw per-country statistics come from.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// The raw `Countries` records of one summary, in source order.
    async fn fetch_summary(&self) -> Result<Vec<Value>, RefreshError>;
}

/// Summary endpoint of a COVID-19 statistics API.
pub struct HttpStatsSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatsSource {
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch_summary(&self) -> Result<Vec<Value>, RefreshError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let summary: Value =
            serde_json::from_slice(&body).map_err(|e| RefreshError::Payload(e.to_string()))?;

        countries_of(summary)
    }
}

/// Pull the `Countries` array out of a summary document.
pub fn countries_of(mut summary: Value) -> Result<Vec<Value>, RefreshError> {
    match summary.get_mut("Countries").map(Value::take) {
        Some(Value::Array(countries)) => Ok(countries),
        Some(other) => Err(RefreshError::Payload(format!(
            "'Countries' is not a list but {}",
            kind_of(&other)
        ))),
        None => Err(RefreshError::Payload("missing 'Countries' list".to_string())),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
