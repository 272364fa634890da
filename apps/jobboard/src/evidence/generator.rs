//! Evidence Generator — turns precomputed match signals into short, ranked
//! "why this job fits you" chips.
//!
//! Pure and deterministic: no I/O, no shared state, never fails. Missing or
//! malformed optional signals simply mean a rule does not fire.

use serde::{Deserialize, Serialize};

use crate::models::job::Job;
use crate::models::profile::UserProfile;

/// Maximum chips shown per job.
pub const MAX_CHIPS: usize = 5;

const SKILL_CONFIDENCE: u8 = 95;
const EXACT_LOCATION_CONFIDENCE: u8 = 100;
const NEAR_CONFIDENCE: u8 = 90;
const REGIONAL_CONFIDENCE: u8 = 70;
const REMOTE_CONFIDENCE: u8 = 100;
const SALARY_MATCH_CONFIDENCE: u8 = 85;
const SALARY_ABOVE_CONFIDENCE: u8 = 95;
const POSTED_TODAY_CONFIDENCE: u8 = 100;
const POSTED_THIS_WEEK_CONFIDENCE: u8 = 90;

const NEAR_KM: f64 = 15.0;
const REGIONAL_KM: f64 = 50.0;
const SENIORITY_THRESHOLD: f64 = 0.8;
const REMOTE_TYPE: &str = "Remote";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    Skill,
    Distance,
    Seniority,
    Salary,
    Freshness,
}

/// One displayable reason a job matches a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceChip {
    pub kind: EvidenceKind,
    pub label: String,
    /// Job or profile field the evidence derives from, for traceability.
    pub source_field: String,
    /// 0 – 100
    pub confidence: u8,
}

impl EvidenceChip {
    fn new(kind: EvidenceKind, label: impl Into<String>, source_field: &str, confidence: u8) -> Self {
        Self {
            kind,
            label: label.into(),
            source_field: source_field.to_string(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryFit {
    Below,
    Match,
    Above,
}

/// Match signals computed upstream by the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSignals {
    #[serde(default)]
    pub skills_match: Vec<String>,
    /// 0.0 – 1.0
    pub experience_score: f64,
    /// Kilometres between the job and the user's preferred location.
    #[serde(default)]
    pub location_distance: Option<f64>,
    pub salary_fit: SalaryFit,
    pub days_since_posted: u32,
}

/// Capped chip list plus how many qualifying chips the cap hid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceSummary {
    pub chips: Vec<EvidenceChip>,
    pub hidden_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Returns at most [`MAX_CHIPS`] chips, highest confidence first. Equal
/// confidences keep collection order.
pub fn generate_chips(job: &Job, profile: &UserProfile, signals: &MatchSignals) -> Vec<EvidenceChip> {
    let mut chips = collect_chips(job, profile, signals);
    // stable: ties stay in collection order
    chips.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    chips.truncate(MAX_CHIPS);
    chips
}

/// [`generate_chips`] plus how many qualifying chips the cap cut.
pub fn summarize_evidence(
    job: &Job,
    profile: &UserProfile,
    signals: &MatchSignals,
) -> EvidenceSummary {
    let qualifying = collect_chips(job, profile, signals).len();
    let chips = generate_chips(job, profile, signals);

    EvidenceSummary {
        hidden_count: qualifying.saturating_sub(chips.len()),
        chips,
    }
}

/// Every qualifying chip, unranked, in rule order.
fn collect_chips(job: &Job, profile: &UserProfile, signals: &MatchSignals) -> Vec<EvidenceChip> {
    let mut chips: Vec<EvidenceChip> = signals
        .skills_match
        .iter()
        .map(|skill| {
            EvidenceChip::new(
                EvidenceKind::Skill,
                format!("Matches skill: {skill}"),
                "job.requirements",
                SKILL_CONFIDENCE,
            )
        })
        .collect();

    if let Some(distance) = signals.location_distance {
        chips.extend(distance_chip(distance));
    }

    if job.employment_type == REMOTE_TYPE && profile.preferred_type.as_deref() == Some(REMOTE_TYPE) {
        chips.push(EvidenceChip::new(
            EvidenceKind::Distance,
            "Remote work available",
            "job.type",
            REMOTE_CONFIDENCE,
        ));
    }

    if signals.experience_score > SENIORITY_THRESHOLD {
        let confidence = (signals.experience_score * 100.0).round().min(100.0) as u8;
        chips.push(EvidenceChip::new(
            EvidenceKind::Seniority,
            "Experience level matches",
            "job.description",
            confidence,
        ));
    }

    match signals.salary_fit {
        SalaryFit::Match => chips.push(EvidenceChip::new(
            EvidenceKind::Salary,
            "Salary within expected range",
            "job.salary",
            SALARY_MATCH_CONFIDENCE,
        )),
        SalaryFit::Above => chips.push(EvidenceChip::new(
            EvidenceKind::Salary,
            "Salary above expectations",
            "job.salary",
            SALARY_ABOVE_CONFIDENCE,
        )),
        SalaryFit::Below => {}
    }

    chips.extend(freshness_chip(signals.days_since_posted));

    chips
}

fn distance_chip(distance: f64) -> Option<EvidenceChip> {
    if !distance.is_finite() || distance < 0.0 {
        return None;
    }

    let km = distance.round();
    if distance == 0.0 {
        Some(EvidenceChip::new(
            EvidenceKind::Distance,
            "Exact location match",
            "job.location",
            EXACT_LOCATION_CONFIDENCE,
        ))
    } else if distance < NEAR_KM {
        Some(EvidenceChip::new(
            EvidenceKind::Distance,
            format!("<{km}km from preferred location"),
            "job.location",
            NEAR_CONFIDENCE,
        ))
    } else if distance < REGIONAL_KM {
        Some(EvidenceChip::new(
            EvidenceKind::Distance,
            format!("{km}km from preferred location"),
            "job.location",
            REGIONAL_CONFIDENCE,
        ))
    } else {
        None
    }
}

fn freshness_chip(days_since_posted: u32) -> Option<EvidenceChip> {
    match days_since_posted {
        0..=1 => Some(EvidenceChip::new(
            EvidenceKind::Freshness,
            "Posted today",
            "job.postedAt",
            POSTED_TODAY_CONFIDENCE,
        )),
        2..=7 => Some(EvidenceChip::new(
            EvidenceKind::Freshness,
            format!("Posted {days_since_posted} days ago"),
            "job.postedAt",
            POSTED_THIS_WEEK_CONFIDENCE,
        )),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
