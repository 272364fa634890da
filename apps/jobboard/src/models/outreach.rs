use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachChannel {
    Email,
    Whatsapp,
    Sms,
}

impl OutreachChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutreachChannel::Email => "email",
            OutreachChannel::Whatsapp => "whatsapp",
            OutreachChannel::Sms => "sms",
        }
    }
}

/// One delivered outreach message, written to `outreach_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachLog {
    pub channel: OutreachChannel,
    pub recipient: String,
    pub job_id: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
}
