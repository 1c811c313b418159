/// Types shared between the message store and the HTTP layer.
pub mod api;
pub mod models;

pub use models::{Message, NewMessage};
