//! Recruiter outreach — delivers composed messages to candidates over email,
//! WhatsApp or SMS and records each delivery.
//!
//! Channel providers are opaque: anything implementing [`ChannelSender`] can
//! be plugged into the [`OutreachDispatcher`].

pub mod handlers;
pub mod templates;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::outreach::{OutreachChannel, OutreachLog};
use crate::storage::JobStore;

const SENT_STATUS: &str = "sent";

/// Payload of the `outreach` queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachTask {
    pub channel: OutreachChannel,
    pub recipient: String,
    pub message: String,
    pub job_id: String,
}

#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, recipient: &str, message: &str, job_id: &str) -> Result<()>;
}

/// Sender that only logs the delivery. Used until a provider is configured
/// for the channel.
pub struct LoggingSender {
    channel: OutreachChannel,
}

impl LoggingSender {
    pub fn new(channel: OutreachChannel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ChannelSender for LoggingSender {
    async fn send(&self, recipient: &str, message: &str, job_id: &str) -> Result<()> {
        info!(
            channel = self.channel.as_str(),
            message_len = message.len(),
            "Sending {} to {recipient} for job {job_id}",
            self.channel.as_str()
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct OutreachDispatcher {
    email: Arc<dyn ChannelSender>,
    whatsapp: Arc<dyn ChannelSender>,
    sms: Arc<dyn ChannelSender>,
}

impl OutreachDispatcher {
    pub fn new(
        email: Arc<dyn ChannelSender>,
        whatsapp: Arc<dyn ChannelSender>,
        sms: Arc<dyn ChannelSender>,
    ) -> Self {
        Self {
            email,
            whatsapp,
            sms,
        }
    }

    /// Dispatcher whose every channel just logs.
    pub fn logging() -> Self {
        Self::new(
            Arc::new(LoggingSender::new(OutreachChannel::Email)),
            Arc::new(LoggingSender::new(OutreachChannel::Whatsapp)),
            Arc::new(LoggingSender::new(OutreachChannel::Sms)),
        )
    }

    fn sender_for(&self, channel: OutreachChannel) -> &dyn ChannelSender {
        match channel {
            OutreachChannel::Email => self.email.as_ref(),
            OutreachChannel::Whatsapp => self.whatsapp.as_ref(),
            OutreachChannel::Sms => self.sms.as_ref(),
        }
    }

    /// Sends the message, then records it. Nothing is recorded when the send
    /// fails.
    pub async fn dispatch(&self, task: &OutreachTask, store: &dyn JobStore) -> Result<OutreachLog> {
        info!(
            "Processing {} outreach to {}",
            task.channel.as_str(),
            task.recipient
        );

        self.sender_for(task.channel)
            .send(&task.recipient, &task.message, &task.job_id)
            .await?;

        let log = OutreachLog {
            channel: task.channel,
            recipient: task.recipient.clone(),
            job_id: task.job_id.clone(),
            status: SENT_STATUS.to_string(),
            sent_at: Utc::now(),
        };
        store.record_outreach(&log).await?;
        Ok(log)
    }
}
