pub mod diagnostics;
pub mod doc_deleted;
pub mod health;

pub use diagnostics::diagnostics;
pub use doc_deleted::doc_deleted;
pub use health::{health_check, ready_check};
