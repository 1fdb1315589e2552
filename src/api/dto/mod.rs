pub mod auth;
pub mod books;
pub mod links;
pub mod reviews;
pub mod users;

use serde::Serialize;

/// Plain confirmation body used by mutations that return no resource.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
