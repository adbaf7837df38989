//! Screening chats: an automated interviewer thread per application.

pub mod handlers;
