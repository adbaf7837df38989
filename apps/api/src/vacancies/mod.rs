pub mod assist;
pub mod handlers;
pub mod prompts;
