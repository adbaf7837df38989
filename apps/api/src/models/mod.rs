pub mod application;
pub mod category;
pub mod chat;
pub mod company;
pub mod resume;
pub mod user;
pub mod vacancy;
