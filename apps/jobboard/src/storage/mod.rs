//! Storage port. Ingestion, evidence and outreach only ever talk to
//! [`JobStore`]; the Postgres implementation lives in [`postgres`].

#[cfg(test)]
pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::outreach::OutreachLog;
use crate::models::profile::UserProfile;

pub use postgres::PgJobStore;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts the job, or replaces the existing row with the same
    /// `(source, source_id)`. Counters, `recruiter_id` and `is_featured` of an
    /// existing row are preserved.
    async fn upsert_job_by_source_id(&self, job: &Job) -> Result<()>;

    async fn get_job(&self, id: &str) -> Result<Option<Job>>;

    async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    async fn record_outreach(&self, log: &OutreachLog) -> Result<()>;
}
