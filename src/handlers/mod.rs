pub mod attendance;
pub mod auth;
pub mod departments;
pub mod documents;
pub mod employees;
pub mod leave;
pub mod leave_balances;
pub mod leave_types;
pub mod organization;
pub mod payroll;
pub mod projects;
pub mod reports;
pub mod shared;
pub mod users;
