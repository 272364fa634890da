//! Field inference — derives structured job fields from free text when the
//! source does not provide them.
//!
//! Keyword tables are static data so new entries never touch control flow.
//! Matching is plain substring containment throughout: no stemming, no word
//! boundaries. That means "Java" also fires on "JavaScript" and "lead" on
//! "leadership"; existing listings depend on this, so keep it.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::job::{ExperienceLevel, JobCategory};

/// Recognized skill keywords, in output order.
pub const SKILL_KEYWORDS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Python",
    "Java",
    "SQL",
    "AWS",
    "Docker",
    "Kubernetes",
    "Git",
    "Agile",
    "Scrum",
    "REST",
    "GraphQL",
];

/// Checked in order; the first group with any hit wins.
const EXPERIENCE_KEYWORDS: &[(&[&str], ExperienceLevel)] = &[
    (&["senior", "lead"], ExperienceLevel::Senior),
    (&["junior", "entry"], ExperienceLevel::Junior),
    (&["mid", "intermediate"], ExperienceLevel::Mid),
];

/// Department keyword (lowercase) → category, checked in order.
const CATEGORY_KEYWORDS: &[(&str, JobCategory)] = &[
    ("engineering", JobCategory::Technology),
    ("development", JobCategory::Technology),
    ("marketing", JobCategory::Marketing),
    ("sales", JobCategory::Sales),
    ("design", JobCategory::Design),
    ("product", JobCategory::Product),
];

/// Location keyword → country. Case-sensitive, checked in order.
const COUNTRY_KEYWORDS: &[(&str, &str)] = &[
    ("Netherlands", "Netherlands"),
    ("Amsterdam", "Netherlands"),
    ("Germany", "Germany"),
    ("Berlin", "Germany"),
    ("France", "France"),
    ("Paris", "France"),
    ("UK", "United Kingdom"),
    ("London", "United Kingdom"),
];

pub const UNKNOWN_COUNTRY: &str = "Unknown";

const SALARY_FIELD_MARKERS: &[&str] = &["salary", "compensation"];

const MIN_REQUIREMENT_CHARS: usize = 10;
const MAX_REQUIREMENTS: usize = 10;

static REQUIREMENTS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)requirements?:?\s*").expect("requirements header pattern is valid")
});

/// Picks the value of the first field whose name mentions salary or
/// compensation. Only the first matching field is considered, even when its
/// value is empty.
pub fn extract_salary<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    fields
        .into_iter()
        .find(|(name, _)| {
            let name = name.to_lowercase();
            SALARY_FIELD_MARKERS.iter().any(|m| name.contains(m))
        })
        .map(|(_, value)| value)
        .unwrap_or_default()
}

/// Extracts the bullet list that follows a "Requirements:" heading.
///
/// The section runs until a blank line, a line starting with an ASCII letter
/// of either case, or the end of the text. Fragments are split on newlines,
/// `•` and `-`; fragments of 10 characters or fewer are dropped and at most
/// 10 are kept.
pub fn extract_requirements(content: &str) -> Vec<String> {
    let Some(header) = REQUIREMENTS_HEADER.find(content) else {
        return Vec::new();
    };
    let rest = &content[header.end()..];
    let section = &rest[..requirements_section_end(rest)];

    section
        .split(['\n', '•', '-'])
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > MIN_REQUIREMENT_CHARS)
        .take(MAX_REQUIREMENTS)
        .map(String::from)
        .collect()
}

fn requirements_section_end(text: &str) -> usize {
    let bytes = text.as_bytes();
    for (idx, _) in text.match_indices('\n') {
        match bytes.get(idx + 1) {
            Some(b'\n') => return idx,
            Some(b) if b.is_ascii_alphabetic() => return idx,
            _ => {}
        }
    }
    text.len()
}

/// Returns every known skill whose keyword occurs anywhere in the content.
pub fn extract_skills(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();
    SKILL_KEYWORDS
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

pub fn determine_experience_level(content: &str) -> ExperienceLevel {
    let lower = content.to_lowercase();
    EXPERIENCE_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, level)| *level)
        .unwrap_or_default()
}

pub fn categorize_job(department: Option<&str>) -> JobCategory {
    let Some(department) = department.filter(|d| !d.is_empty()) else {
        return JobCategory::Other;
    };
    let dept = department.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| dept.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(JobCategory::Other)
}

pub fn extract_country(location: Option<&str>) -> String {
    location
        .and_then(|loc| {
            COUNTRY_KEYWORDS
                .iter()
                .find(|(keyword, _)| loc.contains(keyword))
        })
        .map(|(_, country)| country.to_string())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
}

pub fn is_remote(location: Option<&str>) -> bool {
    location
        .map(|loc| loc.to_lowercase().contains("remote"))
        .unwrap_or(false)
}
