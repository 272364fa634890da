// Match evidence: ranked, capped "why you fit" chips for the job detail and
// search result views.

pub mod generator;
pub mod handlers;
