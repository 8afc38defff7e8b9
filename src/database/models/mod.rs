pub mod attendance;
pub mod auth;
pub mod department;
pub mod document;
pub mod employee;
pub mod leave;
pub mod leave_balance;
pub mod leave_type;
pub(crate) mod macros;
pub mod organization;
pub mod payroll;
pub mod project;
pub mod stats;
pub mod user;

// Re-export all models for easy importing
pub use attendance::*;
pub use auth::*;
pub use department::*;
pub use document::*;
pub use employee::*;
pub use leave::*;
pub use leave_balance::*;
pub use leave_type::*;
pub use organization::*;
pub use payroll::*;
pub use project::*;
pub use stats::*;
pub use user::*;
