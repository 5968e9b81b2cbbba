// Score improvement: similarity scoring, the rewrite loop and the
// orchestrator that ties them to stored resumes and jobs.

pub mod analysis;
pub mod handlers;
pub mod improvement;
pub mod keywords;
pub mod prompts;
pub mod service;
pub mod similarity;
