//! Skill dictionary used for autocomplete on vacancy and resume forms.

pub mod handlers;
