pub mod client;
pub mod models;
pub mod time;
pub mod token;

pub use client::CalendarClient;
pub use models::{CalendarEvent, InputRecord};
pub use token::TokenManager;
