use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::job::{Job, JobRow};
use crate::models::outreach::OutreachLog;
use crate::models::profile::UserProfile;
use crate::storage::JobStore;

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn upsert_job_by_source_id(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, title, company, location, employment_type, salary, description,
                 requirements, benefits, skills, experience_level, remote, posted_date,
                 expires_date, apply_url, source, source_id, category, country, language,
                 views, applications, recruiter_id, is_featured, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
            ON CONFLICT (source, source_id) DO UPDATE SET
                id = EXCLUDED.id,
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                employment_type = EXCLUDED.employment_type,
                salary = EXCLUDED.salary,
                description = EXCLUDED.description,
                requirements = EXCLUDED.requirements,
                benefits = EXCLUDED.benefits,
                skills = EXCLUDED.skills,
                experience_level = EXCLUDED.experience_level,
                remote = EXCLUDED.remote,
                posted_date = EXCLUDED.posted_date,
                expires_date = EXCLUDED.expires_date,
                apply_url = EXCLUDED.apply_url,
                category = EXCLUDED.category,
                country = EXCLUDED.country,
                language = EXCLUDED.language,
                is_active = EXCLUDED.is_active
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.employment_type)
        .bind(&job.salary)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .bind(&job.skills)
        .bind(job.experience_level.as_str())
        .bind(job.remote)
        .bind(job.posted_date)
        .bind(job.expires_date)
        .bind(&job.apply_url)
        .bind(job.source.as_str())
        .bind(&job.source_id)
        .bind(job.category.as_str())
        .bind(&job.country)
        .bind(&job.language)
        .bind(job.views)
        .bind(job.applications)
        .bind(job.recruiter_id)
        .bind(job.is_featured)
        .bind(job.is_active)
        .execute(&self.pool)
        .await?;

        debug!("Upserted job {} ({} {})", job.id, job.source, job.source_id);
        Ok(())
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, company, location, employment_type, salary, description,
                   requirements, benefits, skills, experience_level, remote, posted_date,
                   expires_date, apply_url, source, source_id, category, country, language,
                   views, applications, recruiter_id, is_featured, is_active
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Job::try_from).transpose()
    }

    async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        Ok(sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, skills, experience_years, preferred_locations,
                   preferred_type, languages
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn record_outreach(&self, log: &OutreachLog) -> Result<()> {
        sqlx::query(
            "INSERT INTO outreach_logs (type, recipient, job_id, status, sent_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(log.channel.as_str())
        .bind(&log.recipient)
        .bind(&log.job_id)
        .bind(&log.status)
        .bind(log.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
