// Built-in outreach message templates.
// Placeholders: {{candidateName}} {{jobTitle}} {{company}} {{skills}} {{recruiterName}}

use serde::{Deserialize, Serialize};

use crate::models::outreach::OutreachChannel;

/// How many candidate skills `{{skills}}` lists.
const TEMPLATE_SKILL_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub channel: OutreachChannel,
    /// Email only.
    pub subject: Option<&'static str>,
    pub content: &'static str,
}

pub const TEMPLATES: &[MessageTemplate] = &[
    MessageTemplate {
        id: "professional",
        name: "Professional Introduction",
        channel: OutreachChannel::Email,
        subject: Some("Exciting {{jobTitle}} Opportunity at {{company}}"),
        content: "Hi {{candidateName}},

I hope this message finds you well. I came across your profile and was impressed by your background in {{skills}}.

We have an exciting {{jobTitle}} position at {{company}} that I believe would be a perfect match for your experience.

Would you be interested in learning more about this opportunity? I'd love to schedule a brief call to discuss the details.

Best regards,
{{recruiterName}}
{{company}}",
    },
    MessageTemplate {
        id: "casual",
        name: "Casual Approach",
        channel: OutreachChannel::Email,
        subject: Some("Quick question about your career goals"),
        content: "Hey {{candidateName}},

Quick question - are you open to new opportunities in {{skills}}?

I have a {{jobTitle}} role at {{company}} that caught my eye when I saw your profile. No pressure, just thought it might be interesting for you.

Let me know if you'd like to hear more!

{{recruiterName}}",
    },
    MessageTemplate {
        id: "intro",
        name: "Introduction",
        channel: OutreachChannel::Whatsapp,
        subject: None,
        content: "Hi {{candidateName}}! 👋

I'm {{recruiterName}} from {{company}}. I found your profile and think you'd be perfect for our {{jobTitle}} position.

Are you open to new opportunities? Would love to chat!",
    },
];

/// Values substituted into a template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateContext {
    pub candidate_name: String,
    pub candidate_skills: Vec<String>,
    pub job_title: String,
    pub company: String,
    pub recruiter_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub subject: Option<String>,
    pub body: String,
}

pub fn find_template(channel: OutreachChannel, id: &str) -> Option<&'static MessageTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.channel == channel && t.id == id)
}

pub fn render_template(template: &str, ctx: &TemplateContext) -> String {
    let skills = ctx
        .candidate_skills
        .iter()
        .take(TEMPLATE_SKILL_COUNT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    template
        .replace("{{candidateName}}", &ctx.candidate_name)
        .replace("{{jobTitle}}", &ctx.job_title)
        .replace("{{company}}", &ctx.company)
        .replace("{{skills}}", &skills)
        .replace("{{recruiterName}}", &ctx.recruiter_name)
}

pub fn render_message(template: &MessageTemplate, ctx: &TemplateContext) -> RenderedMessage {
    RenderedMessage {
        subject: template.subject.map(|s| render_template(s, ctx)),
        body: render_template(template.content, ctx),
    }
}
