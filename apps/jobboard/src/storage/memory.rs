//! In-memory [`JobStore`] for tests. Mirrors the Postgres upsert semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::job::{Job, JobSource};
use crate::models::outreach::OutreachLog;
use crate::models::profile::UserProfile;
use crate::storage::JobStore;

#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<(JobSource, String), Job>>,
    profiles: Mutex<HashMap<Uuid, UserProfile>>,
    outreach: Mutex<Vec<OutreachLog>>,
    /// Upserts for these source ids fail, to exercise error paths.
    failing_source_ids: Mutex<Vec<String>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_profile(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
    }

    pub fn fail_upserts_for(&self, source_id: &str) {
        self.failing_source_ids
            .lock()
            .unwrap()
            .push(source_id.to_string());
    }

    pub fn jobs_with_source_id(&self, source_id: &str) -> Vec<Job> {
        self.jobs
            .lock()
            .unwrap()
            .values()
            .filter(|job| job.source_id == source_id)
            .cloned()
            .collect()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn outreach_logs(&self) -> Vec<OutreachLog> {
        self.outreach.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn upsert_job_by_source_id(&self, job: &Job) -> Result<()> {
        if self
            .failing_source_ids
            .lock()
            .unwrap()
            .contains(&job.source_id)
        {
            bail!("simulated write failure for {}", job.source_id);
        }

        let mut jobs = self.jobs.lock().unwrap();
        let key = (job.source, job.source_id.clone());
        let mut incoming = job.clone();
        if let Some(existing) = jobs.get(&key) {
            incoming.views = existing.views;
            incoming.applications = existing.applications;
            incoming.recruiter_id = existing.recruiter_id;
            incoming.is_featured = existing.is_featured;
        }
        jobs.insert(key, incoming);
        Ok(())
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .values()
            .find(|job| job.id == id)
            .cloned())
    }

    async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn record_outreach(&self, log: &OutreachLog) -> Result<()> {
        self.outreach.lock().unwrap().push(log.clone());
        Ok(())
    }
}
