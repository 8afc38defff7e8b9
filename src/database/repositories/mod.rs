pub mod attendance;
pub mod department;
pub mod document;
pub mod employee;
pub mod leave;
pub mod leave_balance;
pub mod leave_type;
pub mod organization;
pub mod payroll;
pub mod project;
pub mod stats;
pub mod user;

// Re-export all repositories for easy importing
pub use attendance::AttendanceRepository;
pub use department::DepartmentRepository;
pub use document::DocumentRepository;
pub use employee::EmployeeRepository;
pub use leave::{ApplyOutcome, ApproveOutcome, LeaveRepository};
pub use leave_balance::LeaveBalanceRepository;
pub use leave_type::LeaveTypeRepository;
pub use organization::OrganizationRepository;
pub use payroll::PayrollRepository;
pub use project::ProjectRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;
