pub mod attendance;
pub mod employee;
pub mod kpi;
pub mod leave;
pub mod master;
pub mod payroll;
pub mod role;
pub mod settings;
pub mod user;
