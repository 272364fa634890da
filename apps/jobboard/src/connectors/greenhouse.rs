//! Greenhouse Harvest connector.
//!
//! Fetches every job for one company in a single request and maps each
//! Greenhouse record to a canonical [`Job`], inferring skills, seniority,
//! category, country and salary from the posting text and custom fields.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::connectors::inference::{
    categorize_job, determine_experience_level, extract_country, extract_requirements,
    extract_salary, extract_skills, is_remote,
};
use crate::connectors::{ConnectorError, JobConnector};
use crate::models::job::{Job, JobSource};

pub const DEFAULT_BASE_URL: &str = "https://harvest-api.greenhouse.io/v1";
const PER_PAGE: u32 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 30;

const DEFAULT_COMPANY: &str = "Unknown Company";
const DEFAULT_LOCATION: &str = "Remote";
const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";
const DEFAULT_LANGUAGE: &str = "en";

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GreenhouseJobsResponse {
    pub jobs: Vec<RawJob>,
}

/// One Harvest job record. Greenhouse sends `null` as freely as it omits a
/// key, so every optional collection is an `Option`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    pub id: u64,
    pub name: Option<String>,
    pub content: Option<String>,
    pub created_at: String,
    pub absolute_url: Option<String>,
    pub departments: Option<Vec<Department>>,
    pub offices: Option<Vec<Office>>,
    pub custom_fields: Option<CustomFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Department {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Office {
    pub location: Option<OfficeLocation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfficeLocation {
    pub name: Option<String>,
}

/// Greenhouse exposes custom fields either as a list of named fields or as a
/// key → value map depending on the endpoint; both are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CustomFields {
    List(Vec<CustomField>),
    Map(serde_json::Map<String, Value>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomField {
    pub name: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl CustomFields {
    /// All fields as `(name, rendered value)` pairs. Lists keep payload order,
    /// maps iterate in key order.
    pub fn entries(&self) -> Vec<(&str, String)> {
        match self {
            CustomFields::List(fields) => fields
                .iter()
                .map(|f| (f.name.as_deref().unwrap_or_default(), render_value(&f.value)))
                .collect(),
            CustomFields::Map(map) => map
                .iter()
                .map(|(name, value)| (name.as_str(), render_value(value)))
                .collect(),
        }
    }

    /// Non-empty value of the field with the given key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            CustomFields::List(fields) => fields
                .iter()
                .find(|f| {
                    f.name
                        .as_deref()
                        .is_some_and(|name| name.eq_ignore_ascii_case(key))
                })
                .map(|f| render_value(&f.value)),
            CustomFields::Map(map) => map.get(key).map(render_value),
        };
        value.filter(|v| !v.is_empty())
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Connector
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GreenhouseConnector {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GreenhouseConnector {
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ConnectorError::Client)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JobConnector for GreenhouseConnector {
    async fn fetch_jobs(&self, company_id: &str) -> Result<Vec<Job>, ConnectorError> {
        let url = format!("{}/jobs?per_page={PER_PAGE}", self.base_url);
        debug!("Fetching Greenhouse jobs for company {company_id}");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.api_key, Some(""))
            .header("On-Behalf-Of", company_id)
            .send()
            .await
            .map_err(|e| {
                error!("Greenhouse request failed for company {company_id}: {e}");
                ConnectorError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                status = status.as_u16(),
                "Greenhouse API returned non-success for company {company_id}"
            );
            return Err(ConnectorError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(ConnectorError::Transport)?;
        let payload: GreenhouseJobsResponse =
            serde_json::from_str(&body).map_err(|e| ConnectorError::Parse(e.to_string()))?;

        let jobs = payload
            .jobs
            .into_iter()
            .map(transform_job)
            .collect::<Result<Vec<_>, _>>()?;

        info!("Fetched {} Greenhouse jobs for company {company_id}", jobs.len());
        Ok(jobs)
    }
}

/// Maps one Greenhouse record to a canonical job.
pub fn transform_job(raw: RawJob) -> Result<Job, ConnectorError> {
    let source_id = raw.id.to_string();

    let posted_date = DateTime::parse_from_rfc3339(&raw.created_at)
        .map_err(|e| {
            ConnectorError::Parse(format!(
                "job {source_id}: invalid created_at '{}': {e}",
                raw.created_at
            ))
        })?
        .with_timezone(&Utc);

    let department = raw
        .departments
        .iter()
        .flatten()
        .next()
        .and_then(|d| d.name.as_deref())
        .filter(|name| !name.is_empty());
    let office_location = raw
        .offices
        .iter()
        .flatten()
        .next()
        .and_then(|o| o.location.as_ref())
        .and_then(|l| l.name.as_deref())
        .filter(|name| !name.is_empty());

    let custom_fields = raw.custom_fields.as_ref();
    let salary = custom_fields
        .map(|f| extract_salary(f.entries()))
        .unwrap_or_default();
    let employment_type = custom_fields
        .and_then(|f| f.get("employment_type"))
        .unwrap_or_else(|| DEFAULT_EMPLOYMENT_TYPE.to_string());
    let expires_date = custom_fields
        .and_then(|f| f.get("application_deadline"))
        .and_then(|deadline| {
            let parsed = parse_deadline(&deadline);
            if parsed.is_none() {
                warn!("Ignoring unparsable application_deadline '{deadline}' on job {source_id}");
            }
            parsed
        });

    let content = raw.content.as_deref().unwrap_or_default();

    Ok(Job {
        id: Job::canonical_id(JobSource::Greenhouse, &source_id),
        title: raw.name.clone().unwrap_or_default(),
        company: department.unwrap_or(DEFAULT_COMPANY).to_string(),
        location: office_location.unwrap_or(DEFAULT_LOCATION).to_string(),
        employment_type,
        salary,
        description: content.to_string(),
        requirements: extract_requirements(content),
        benefits: Vec::new(),
        skills: extract_skills(content),
        experience_level: determine_experience_level(content),
        remote: is_remote(office_location),
        posted_date,
        expires_date,
        apply_url: raw.absolute_url.clone().unwrap_or_default(),
        source: JobSource::Greenhouse,
        source_id,
        category: categorize_job(department),
        country: extract_country(office_location),
        language: DEFAULT_LANGUAGE.to_string(),
        views: 0,
        applications: 0,
        recruiter_id: None,
        is_featured: false,
        is_active: true,
    })
}

fn parse_deadline(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{ExperienceLevel, JobCategory};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn raw(value: Value) -> RawJob {
        serde_json::from_value(value).unwrap()
    }

    fn sample_payload() -> Value {
        json!({
            "id": 4012,
            "name": "Senior Backend Engineer",
            "content": "Senior Engineer wanted. We use Python, SQL and Docker.\nRequirements:\n- 5+ years of Python experience\n- Solid SQL knowledge\n\nBenefits: plenty",
            "created_at": "2026-10-01T09:30:00Z",
            "absolute_url": "https://boards.greenhouse.io/acme/jobs/4012",
            "departments": [{ "name": "Platform Engineering" }],
            "offices": [{ "location": { "name": "Amsterdam (Remote friendly)" } }],
            "custom_fields": {
                "employment_type": "Contract",
                "salary_range": "€70.000 - €90.000",
                "application_deadline": "2026-12-01"
            }
        })
    }

    #[test]
    fn test_transform_maps_all_fields() {
        let job = transform_job(raw(sample_payload())).unwrap();

        assert_eq!(job.id, "gh_4012");
        assert_eq!(job.source_id, "4012");
        assert_eq!(job.source, JobSource::Greenhouse);
        assert_eq!(job.title, "Senior Backend Engineer");
        assert_eq!(job.company, "Platform Engineering");
        assert_eq!(job.location, "Amsterdam (Remote friendly)");
        assert_eq!(job.employment_type, "Contract");
        assert_eq!(job.salary, "€70.000 - €90.000");
        assert_eq!(
            job.requirements,
            vec!["5+ years of Python experience", "Solid SQL knowledge"]
        );
        assert_eq!(job.skills, vec!["Python", "SQL", "Docker"]);
        assert_eq!(job.experience_level, ExperienceLevel::Senior);
        assert!(job.remote);
        assert_eq!(job.category, JobCategory::Technology);
        assert_eq!(job.country, "Netherlands");
        assert_eq!(job.language, "en");
        assert_eq!(job.apply_url, "https://boards.greenhouse.io/acme/jobs/4012");
        assert_eq!(
            job.expires_date.unwrap().to_rfc3339(),
            "2026-12-01T00:00:00+00:00"
        );
        assert_eq!(job.views, 0);
        assert_eq!(job.applications, 0);
        assert!(job.recruiter_id.is_none());
        assert!(!job.is_featured);
        assert!(job.is_active);
        assert!(job.benefits.is_empty());
    }

    #[test]
    fn test_transform_defaults_for_sparse_record() {
        let job = transform_job(raw(json!({
            "id": 7,
            "name": "Office Manager",
            "created_at": "2026-10-01T09:30:00Z"
        })))
        .unwrap();

        assert_eq!(job.company, "Unknown Company");
        assert_eq!(job.location, "Remote");
        // the remote flag only looks at the office the source actually gave
        assert!(!job.remote);
        assert_eq!(job.country, "Unknown");
        assert_eq!(job.category, JobCategory::Other);
        assert_eq!(job.employment_type, "Full-time");
        assert_eq!(job.salary, "");
        assert_eq!(job.description, "");
        assert!(job.requirements.is_empty());
        assert!(job.skills.is_empty());
        assert_eq!(job.experience_level, ExperienceLevel::Mid);
        assert!(job.expires_date.is_none());
    }

    #[test]
    fn test_null_collections_fall_back_to_defaults() {
        let payload: GreenhouseJobsResponse = serde_json::from_value(json!({
            "jobs": [{
                "id": 1,
                "name": null,
                "created_at": "2026-10-01T09:30:00Z",
                "departments": null,
                "offices": null,
                "custom_fields": null
            }]
        }))
        .unwrap();
        let job = transform_job(payload.jobs.into_iter().next().unwrap()).unwrap();

        assert_eq!(job.title, "");
        assert_eq!(job.company, "Unknown Company");
        assert_eq!(job.location, "Remote");
        assert_eq!(job.category, JobCategory::Other);
        assert_eq!(job.country, "Unknown");
        assert!(!job.remote);
    }

    #[test]
    fn test_custom_field_with_null_name_is_skipped() {
        let job = transform_job(raw(json!({
            "id": 9,
            "name": "Designer",
            "created_at": "2026-10-01T09:30:00Z",
            "custom_fields": [
                { "name": null, "value": "ignored" },
                { "name": "Salary", "value": "€50k" }
            ]
        })))
        .unwrap();

        assert_eq!(job.salary, "€50k");
        assert_eq!(job.employment_type, "Full-time");
    }

    #[test]
    fn test_transform_list_custom_fields() {
        let job = transform_job(raw(json!({
            "id": 8,
            "name": "Sales Lead",
            "created_at": "2026-10-01T09:30:00Z",
            "custom_fields": [
                { "name": "Team", "value": "EMEA" },
                { "name": "Compensation Band", "value": 85000 },
                { "name": "employment_type", "value": "Part-time" }
            ]
        })))
        .unwrap();

        assert_eq!(job.salary, "85000");
        assert_eq!(job.employment_type, "Part-time");
    }

    #[test]
    fn test_transform_missing_custom_fields_gives_empty_salary() {
        let mut payload = sample_payload();
        payload["custom_fields"] = Value::Null;
        let job = transform_job(raw(payload)).unwrap();
        assert_eq!(job.salary, "");
    }

    #[test]
    fn test_transform_invalid_created_at_is_parse_error() {
        let mut payload = sample_payload();
        payload["created_at"] = json!("yesterday");
        let err = transform_job(raw(payload)).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_unparsable_deadline_is_dropped() {
        let mut payload = sample_payload();
        payload["custom_fields"]["application_deadline"] = json!("ASAP");
        let job = transform_job(raw(payload)).unwrap();
        assert!(job.expires_date.is_none());
    }

    #[tokio::test]
    async fn test_fetch_jobs_sends_auth_and_company_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jobs"))
            .and(query_param("per_page", "500"))
            .and(header("Authorization", "Basic dGVzdC1rZXk6"))
            .and(header("On-Behalf-Of", "acme"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "jobs": [sample_payload()] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let connector =
            GreenhouseConnector::with_base_url("test-key".to_string(), server.uri()).unwrap();
        let jobs = connector.fetch_jobs("acme").await.unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "gh_4012");
    }

    #[tokio::test]
    async fn test_fetch_jobs_non_success_carries_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let connector =
            GreenhouseConnector::with_base_url("bad-key".to_string(), server.uri()).unwrap();
        let err = connector.fetch_jobs("acme").await.unwrap_err();

        assert!(err.is_fetch_error());
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_fetch_jobs_malformed_payload_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .mount(&server)
            .await;

        let connector =
            GreenhouseConnector::with_base_url("test-key".to_string(), server.uri()).unwrap();
        let err = connector.fetch_jobs("acme").await.unwrap_err();

        assert!(err.is_parse_error());
    }

    #[tokio::test]
    async fn test_one_bad_record_fails_whole_batch() {
        let server = MockServer::start().await;
        let mut broken = sample_payload();
        broken["id"] = json!(4013);
        broken["created_at"] = json!("not a date");

        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jobs": [sample_payload(), broken] })),
            )
            .mount(&server)
            .await;

        let connector =
            GreenhouseConnector::with_base_url("test-key".to_string(), server.uri()).unwrap();
        assert!(connector.fetch_jobs("acme").await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error_and_writes_nothing() {
        use crate::ingestion::ingest_jobs;
        use crate::storage::memory::InMemoryJobStore;

        // nothing listens on port 1
        let connector = GreenhouseConnector::with_base_url(
            "test-key".to_string(),
            "http://127.0.0.1:1".to_string(),
        )
        .unwrap();

        let err = connector.fetch_jobs("acme").await.unwrap_err();
        assert!(matches!(err, ConnectorError::Transport(_)));
        assert!(err.is_fetch_error());
        assert_eq!(err.status(), None);

        let store = InMemoryJobStore::new();
        assert!(ingest_jobs(&connector, "acme", &store).await.is_err());
        assert_eq!(store.job_count(), 0);
    }
}
