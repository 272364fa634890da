pub mod job;
pub mod outreach;
pub mod profile;
