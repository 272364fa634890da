//! Redis list-backed task queues.
//!
//! Producers `LPUSH` JSON tasks, workers `BRPOP` them, so each queue is FIFO.
//! Tasks whose handler fails are parked on `<queue>:failed` with the error;
//! re-driving them is left to operators or an external scheduler.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use redis::Client as RedisClient;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

pub const INGESTION_QUEUE: &str = "job-ingestion";
pub const OUTREACH_QUEUE: &str = "outreach";

const RECONNECT_DELAY: Duration = Duration::from_secs(1);
/// Newest entries kept on a `<queue>:failed` list.
pub const FAILED_LIST_CAP: isize = 1000;
const REDACTED: &str = "<redacted>";

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Task payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A task that could not be processed, as stored on the failed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedTask {
    pub queue: String,
    pub payload: String,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub waiting: u64,
    pub failed: u64,
}

#[derive(Clone)]
pub struct RedisQueue {
    client: RedisClient,
    name: String,
    redacted_fields: &'static [&'static str],
}

impl RedisQueue {
    pub fn new(client: RedisClient, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            redacted_fields: &[],
        }
    }

    /// Top-level task fields masked before a payload is parked on the failed
    /// list.
    pub fn with_redacted_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.redacted_fields = fields;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn failed_key(&self) -> String {
        format!("{}:failed", self.name)
    }

    pub async fn push<T: Serialize>(&self, task: &T) -> Result<(), QueueError> {
        let payload = serde_json::to_string(task)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("LPUSH")
            .arg(&self.name)
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Enqueued task on {}", self.name);
        Ok(())
    }

    /// Blocks up to `timeout` for the next raw task payload.
    pub async fn pop_raw(&self, timeout: Duration) -> Result<Option<String>, QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(&self.name)
            .arg(timeout.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(popped.map(|(_, payload)| payload))
    }

    /// Parks a failed task, keeping only the newest [`FAILED_LIST_CAP`] entries.
    pub async fn record_failure(&self, payload: &str, error: &str) -> Result<(), QueueError> {
        let failed = FailedTask {
            queue: self.name.clone(),
            payload: redact_payload(payload, self.redacted_fields),
            error: error.to_string(),
            failed_at: Utc::now(),
        };
        let key = self.failed_key();
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::pipe()
            .atomic()
            .cmd("LPUSH")
            .arg(&key)
            .arg(serde_json::to_string(&failed)?)
            .ignore()
            .cmd("LTRIM")
            .arg(&key)
            .arg(0)
            .arg(FAILED_LIST_CAP - 1)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<QueueStats, QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let waiting: u64 = redis::cmd("LLEN")
            .arg(&self.name)
            .query_async(&mut conn)
            .await?;
        let failed: u64 = redis::cmd("LLEN")
            .arg(self.failed_key())
            .query_async(&mut conn)
            .await?;
        Ok(QueueStats { waiting, failed })
    }
}

/// Consumes `queue` forever, handing each decoded task to `handler`.
///
/// Undecodable payloads and handler errors are recorded on the failed list;
/// Redis outages are logged and retried after a short pause.
pub async fn run_worker<T, H, Fut>(queue: RedisQueue, poll_timeout: Duration, handler: H)
where
    T: DeserializeOwned,
    H: Fn(T) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    tracing::info!("Worker started on queue {}", queue.name());

    loop {
        let payload = match queue.pop_raw(poll_timeout).await {
            Ok(Some(payload)) => payload,
            Ok(None) => continue,
            Err(e) => {
                warn!("Queue {} unavailable: {e}", queue.name());
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        let outcome = match decode_task::<T>(&payload) {
            Ok(task) => handler(task).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = outcome {
            error!("Task on {} failed: {e:#}", queue.name());
            if let Err(record_err) = queue.record_failure(&payload, &format!("{e:#}")).await {
                error!(
                    "Could not record failed task on {}: {record_err}",
                    queue.name()
                );
            }
        }
    }
}

fn decode_task<T: DeserializeOwned>(payload: &str) -> Result<T, QueueError> {
    Ok(serde_json::from_str(payload)?)
}

/// Masks `fields` in a JSON object payload. A payload that is not a JSON
/// object cannot be inspected, so it is replaced wholesale when any field is
/// sensitive.
fn redact_payload(payload: &str, fields: &[&str]) -> String {
    if fields.is_empty() {
        return payload.to_string();
    }

    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::Object(mut map)) => {
            for field in fields {
                if let Some(value) = map.get_mut(*field) {
                    *value = serde_json::Value::String(REDACTED.to_string());
                }
            }
            serde_json::Value::Object(map).to_string()
        }
        _ => REDACTED.to_string(),
    }
}
