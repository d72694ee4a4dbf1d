pub mod api;
pub mod document;
pub mod message;

pub use api::*;
pub use document::*;
pub use message::*;
