pub mod extract;
pub mod handlers;
pub mod pdf;
pub mod prompts;
pub mod service;
