//! Job ingestion — pulls a company's postings through a connector and upserts
//! them into the store.
//!
//! Flow: queue task → build_connector → fetch_jobs → upsert each job by
//! `(source, source_id)`.

pub mod handlers;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::connectors::{build_connector, ConnectorError, ConnectorSettings, JobConnector};
use crate::storage::JobStore;

/// Payload of the `job-ingestion` queue.
#[derive(Clone, Serialize, Deserialize)]
pub struct IngestionTask {
    pub connector_type: String,
    pub company_id: String,
    pub api_key: String,
}

impl IngestionTask {
    /// Fields never written to logs or the failed list in clear text.
    pub const SECRET_FIELDS: &'static [&'static str] = &["api_key"];
}

impl fmt::Debug for IngestionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionTask")
            .field("connector_type", &self.connector_type)
            .field("company_id", &self.company_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    pub fetched: usize,
    pub processed: usize,
    pub failed: usize,
}

/// Fetches once and upserts every job.
///
/// A fetch error aborts before anything is written. A failed upsert is logged
/// and counted; the remaining jobs are still written.
pub async fn ingest_jobs(
    connector: &dyn JobConnector,
    company_id: &str,
    store: &dyn JobStore,
) -> Result<IngestionSummary, ConnectorError> {
    let jobs = connector.fetch_jobs(company_id).await?;

    let mut summary = IngestionSummary {
        fetched: jobs.len(),
        ..IngestionSummary::default()
    };

    for job in &jobs {
        match store.upsert_job_by_source_id(job).await {
            Ok(()) => summary.processed += 1,
            Err(e) => {
                error!("Error storing job {}: {e:#}", job.id);
                summary.failed += 1;
            }
        }
    }

    info!(
        processed = summary.processed,
        failed = summary.failed,
        "Successfully processed {} jobs for company {company_id}",
        summary.processed
    );
    Ok(summary)
}

/// Worker entry point for one queue task.
pub async fn process_ingestion_task(
    task: IngestionTask,
    settings: &ConnectorSettings,
    store: &dyn JobStore,
) -> Result<IngestionSummary, ConnectorError> {
    info!(
        "Processing job ingestion for {} company {}",
        task.connector_type, task.company_id
    );

    let connector = build_connector(&task.connector_type, &task.api_key, settings)?;
    ingest_jobs(connector.as_ref(), &task.company_id, store)
        .await
        .inspect_err(|e| {
            let kind = if e.is_fetch_error() {
                "fetch"
            } else if e.is_parse_error() {
                "parse"
            } else {
                "other"
            };
            error!(
                kind,
                status = ?e.status(),
                "Job ingestion failed for company {}: {e}", task.company_id
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::models::job::{sample_job, Job};
    use crate::storage::memory::InMemoryJobStore;

    struct FixedConnector(Vec<Job>);

    #[async_trait]
    impl JobConnector for FixedConnector {
        async fn fetch_jobs(&self, _company_id: &str) -> Result<Vec<Job>, ConnectorError> {
            Ok(self.0.clone())
        }
    }

    struct FailingConnector(u16);

    #[async_trait]
    impl JobConnector for FailingConnector {
        async fn fetch_jobs(&self, _company_id: &str) -> Result<Vec<Job>, ConnectorError> {
            Err(ConnectorError::Status { status: self.0 })
        }
    }

    #[tokio::test]
    async fn test_ingest_upserts_every_job() {
        let store = InMemoryJobStore::new();
        let connector = FixedConnector(vec![sample_job("1"), sample_job("2")]);

        let summary = ingest_jobs(&connector, "acme", &store).await.unwrap();

        assert_eq!(
            summary,
            IngestionSummary {
                fetched: 2,
                processed: 2,
                failed: 0
            }
        );
        assert_eq!(store.job_count(), 2);
    }

    #[tokio::test]
    async fn test_reingest_replaces_instead_of_duplicating() {
        let store = InMemoryJobStore::new();
        ingest_jobs(&FixedConnector(vec![sample_job("42")]), "acme", &store)
            .await
            .unwrap();

        let mut renamed = sample_job("42");
        renamed.title = "Staff Backend Engineer".to_string();
        ingest_jobs(&FixedConnector(vec![renamed]), "acme", &store)
            .await
            .unwrap();

        let rows = store.jobs_with_source_id("42");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Staff Backend Engineer");
        assert_eq!(rows[0].id, "gh_42");
    }

    #[tokio::test]
    async fn test_reingest_keeps_counters() {
        let store = InMemoryJobStore::new();
        let mut viewed = sample_job("42");
        viewed.views = 120;
        viewed.applications = 4;
        viewed.is_featured = true;
        store.upsert_job_by_source_id(&viewed).await.unwrap();

        ingest_jobs(&FixedConnector(vec![sample_job("42")]), "acme", &store)
            .await
            .unwrap();

        let rows = store.jobs_with_source_id("42");
        assert_eq!(rows[0].views, 120);
        assert_eq!(rows[0].applications, 4);
        assert!(rows[0].is_featured);
    }

    #[tokio::test]
    async fn test_fetch_error_writes_nothing() {
        let store = InMemoryJobStore::new();

        let err = ingest_jobs(&FailingConnector(500), "acme", &store)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(store.job_count(), 0);
    }

    #[tokio::test]
    async fn test_single_upsert_failure_is_counted() {
        let store = InMemoryJobStore::new();
        store.fail_upserts_for("2");
        let connector = FixedConnector(vec![sample_job("1"), sample_job("2"), sample_job("3")]);

        let summary = ingest_jobs(&connector, "acme", &store).await.unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(store.job_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_connector_task_fails() {
        let store = InMemoryJobStore::new();
        let task = IngestionTask {
            connector_type: "workday".to_string(),
            company_id: "acme".to_string(),
            api_key: "secret".to_string(),
        };
        let settings = ConnectorSettings {
            greenhouse_base_url: "http://localhost:1".to_string(),
        };

        let err = process_ingestion_task(task, &settings, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownConnector(_)));
    }

    #[test]
    fn test_secret_fields_name_real_task_fields() {
        let task = IngestionTask {
            connector_type: "greenhouse".to_string(),
            company_id: "acme".to_string(),
            api_key: "super-secret".to_string(),
        };
        let value = serde_json::to_value(&task).unwrap();
        for field in IngestionTask::SECRET_FIELDS {
            assert!(value.get(*field).is_some(), "{field} is not a task field");
        }
    }

    #[test]
    fn test_task_debug_redacts_api_key() {
        let task = IngestionTask {
            connector_type: "greenhouse".to_string(),
            company_id: "acme".to_string(),
            api_key: "super-secret".to_string(),
        };
        let debug = format!("{task:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("acme"));
    }
}
