// Services module
// Persistence, realtime channel, and local session storage

pub mod database;
pub mod meeting;
pub mod realtime;
pub mod session;
