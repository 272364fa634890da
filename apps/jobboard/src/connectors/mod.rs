//! Connectors — fetch postings from an external job source and normalize them
//! into canonical [`Job`]s.
//!
//! A connector performs exactly one outbound fetch per call. Any fetch or
//! payload failure fails the whole call: no partially-normalized batch is ever
//! returned. Retry policy belongs to the caller.

pub mod greenhouse;
pub mod inference;

use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::job::Job;

pub use greenhouse::GreenhouseConnector;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Greenhouse API error: {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed payload: {0}")]
    Parse(String),

    #[error("Unknown connector type: {0}")]
    UnknownConnector(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ConnectorError {
    /// Upstream HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConnectorError::Status { status } => Some(*status),
            ConnectorError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ConnectorError::Status { .. } | ConnectorError::Transport(_)
        )
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, ConnectorError::Parse(_))
    }
}

/// A source of job postings for one tenant/company at a time.
#[async_trait]
pub trait JobConnector: Send + Sync {
    async fn fetch_jobs(&self, company_id: &str) -> Result<Vec<Job>, ConnectorError>;
}

/// Connector names accepted on the ingestion queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorType {
    Greenhouse,
}

impl FromStr for ConnectorType {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greenhouse" => Ok(ConnectorType::Greenhouse),
            other => Err(ConnectorError::UnknownConnector(other.to_string())),
        }
    }
}

/// Settings shared by every connector instance.
#[derive(Debug, Clone)]
pub struct ConnectorSettings {
    pub greenhouse_base_url: String,
}

/// Builds the connector for a queue task's connector name and credentials.
pub fn build_connector(
    connector_type: &str,
    api_key: &str,
    settings: &ConnectorSettings,
) -> Result<Box<dyn JobConnector>, ConnectorError> {
    match connector_type.parse::<ConnectorType>()? {
        ConnectorType::Greenhouse => Ok(Box::new(GreenhouseConnector::with_base_url(
            api_key.to_string(),
            settings.greenhouse_base_url.clone(),
        )?)),
    }
}
