use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which connector produced a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    Greenhouse,
}

impl JobSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSource::Greenhouse => "greenhouse",
        }
    }

    /// Prefix used when deriving the canonical job id.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            JobSource::Greenhouse => "gh",
        }
    }
}

impl fmt::Display for JobSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greenhouse" => Ok(JobSource::Greenhouse),
            other => Err(anyhow!("unknown job source '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    #[default]
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Junior" => Ok(ExperienceLevel::Junior),
            "Mid" => Ok(ExperienceLevel::Mid),
            "Senior" => Ok(ExperienceLevel::Senior),
            other => Err(anyhow!("unknown experience level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobCategory {
    Technology,
    Marketing,
    Sales,
    Design,
    Product,
    #[default]
    Other,
}

impl JobCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobCategory::Technology => "Technology",
            JobCategory::Marketing => "Marketing",
            JobCategory::Sales => "Sales",
            JobCategory::Design => "Design",
            JobCategory::Product => "Product",
            JobCategory::Other => "Other",
        }
    }
}

impl FromStr for JobCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Technology" => Ok(JobCategory::Technology),
            "Marketing" => Ok(JobCategory::Marketing),
            "Sales" => Ok(JobCategory::Sales),
            "Design" => Ok(JobCategory::Design),
            "Product" => Ok(JobCategory::Product),
            "Other" => Ok(JobCategory::Other),
            other => Err(anyhow!("unknown job category '{other}'")),
        }
    }
}

/// Canonical posting. Every connector maps its records into this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// `{source prefix}_{source_id}`, see [`Job::canonical_id`].
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: String,
    /// Free text, empty when the source has no salary field.
    pub salary: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub remote: bool,
    pub posted_date: DateTime<Utc>,
    pub expires_date: Option<DateTime<Utc>>,
    pub apply_url: String,
    pub source: JobSource,
    pub source_id: String,
    pub category: JobCategory,
    pub country: String,
    pub language: String,
    pub views: i32,
    pub applications: i32,
    pub recruiter_id: Option<Uuid>,
    pub is_featured: bool,
    pub is_active: bool,
}

impl Job {
    pub fn canonical_id(source: JobSource, source_id: &str) -> String {
        format!("{}_{}", source.id_prefix(), source_id)
    }
}

/// Row shape of the `jobs` table. Enum columns are stored as TEXT.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub employment_type: String,
    pub salary: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub skills: Vec<String>,
    pub experience_level: String,
    pub remote: bool,
    pub posted_date: DateTime<Utc>,
    pub expires_date: Option<DateTime<Utc>>,
    pub apply_url: String,
    pub source: String,
    pub source_id: String,
    pub category: String,
    pub country: String,
    pub language: String,
    pub views: i32,
    pub applications: i32,
    pub recruiter_id: Option<Uuid>,
    pub is_featured: bool,
    pub is_active: bool,
}

impl TryFrom<JobRow> for Job {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            experience_level: row.experience_level.parse()?,
            source: row.source.parse()?,
            category: row.category.parse()?,
            id: row.id,
            title: row.title,
            company: row.company,
            location: row.location,
            employment_type: row.employment_type,
            salary: row.salary,
            description: row.description,
            requirements: row.requirements,
            benefits: row.benefits,
            skills: row.skills,
            remote: row.remote,
            posted_date: row.posted_date,
            expires_date: row.expires_date,
            apply_url: row.apply_url,
            source_id: row.source_id,
            country: row.country,
            language: row.language,
            views: row.views,
            applications: row.applications,
            recruiter_id: row.recruiter_id,
            is_featured: row.is_featured,
            is_active: row.is_active,
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_job(source_id: &str) -> Job {
    Job {
        id: Job::canonical_id(JobSource::Greenhouse, source_id),
        title: "Backend Engineer".to_string(),
        company: "Engineering".to_string(),
        location: "Amsterdam".to_string(),
        employment_type: "Full-time".to_string(),
        salary: String::new(),
        description: "Python and SQL".to_string(),
        requirements: vec![],
        benefits: vec![],
        skills: vec!["Python".to_string(), "SQL".to_string()],
        experience_level: ExperienceLevel::Mid,
        remote: false,
        posted_date: Utc::now(),
        expires_date: None,
        apply_url: format!("https://boards.greenhouse.io/acme/jobs/{source_id}"),
        source: JobSource::Greenhouse,
        source_id: source_id.to_string(),
        category: JobCategory::Technology,
        country: "Netherlands".to_string(),
        language: "en".to_string(),
        views: 0,
        applications: 0,
        recruiter_id: None,
        is_featured: false,
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_id_is_prefixed_by_source() {
        assert_eq!(Job::canonical_id(JobSource::Greenhouse, "4012"), "gh_4012");
    }

    #[test]
    fn test_employment_type_serializes_as_type() {
        let json = serde_json::to_value(sample_job("1")).unwrap();
        assert_eq!(json["type"], "Full-time");
        assert!(json.get("employment_type").is_none());
        assert_eq!(json["source"], "greenhouse");
        assert_eq!(json["experience_level"], "Mid");
    }

    #[test]
    fn test_row_enum_columns_round_trip() {
        let job = sample_job("7");
        let row = JobRow {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            employment_type: job.employment_type.clone(),
            salary: job.salary.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            benefits: job.benefits.clone(),
            skills: job.skills.clone(),
            experience_level: job.experience_level.as_str().to_string(),
            remote: job.remote,
            posted_date: job.posted_date,
            expires_date: job.expires_date,
            apply_url: job.apply_url.clone(),
            source: job.source.as_str().to_string(),
            source_id: job.source_id.clone(),
            category: job.category.as_str().to_string(),
            country: job.country.clone(),
            language: job.language.clone(),
            views: 0,
            applications: 0,
            recruiter_id: None,
            is_featured: false,
            is_active: true,
        };
        assert_eq!(Job::try_from(row).unwrap(), job);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!("IT & Software".parse::<JobCategory>().is_err());
    }
}
