pub mod auth;
pub mod storage;

pub use auth::{AuthService, Claims, LoginOutcome, RegisterOutcome};
pub use storage::{DocumentStore, StoredFile};
