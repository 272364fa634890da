use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Candidate preferences as stored by the profile service. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub skills: Vec<String>,
    pub experience_years: i32,
    pub preferred_locations: Vec<String>,
    /// Preferred employment type, e.g. "Full-time" or "Remote".
    pub preferred_type: Option<String>,
    pub languages: Vec<String>,
}
