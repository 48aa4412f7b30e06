pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::attendance::AttendanceRecord;
use crate::model::employee::{Employee, PositionHistory};
use crate::model::kpi::Kpi;
use crate::model::leave::LeaveRequest;
use crate::model::master::{LeaveType, PartnerBank, Position, Unit};
use crate::model::payroll::{EmployeeSalaryComponent, PayrollComponent, Payslip};
use crate::model::user::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

/// Persistence port for the whole HRIS dataset. Handlers only ever see
/// this trait; the concrete backend is picked at startup.
#[async_trait]
pub trait HrisStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // Employees
    async fn list_employees(&self) -> Result<Vec<Employee>, StoreError>;
    async fn find_employee(&self, id: &str) -> Result<Option<Employee>, StoreError>;
    async fn find_employee_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError>;
    async fn create_employee(&self, employee: Employee) -> Result<(), StoreError>;
    async fn update_employee(&self, employee: Employee) -> Result<(), StoreError>;
    async fn delete_employee(&self, id: &str) -> Result<(), StoreError>;

    // Position history, newest assignment first. The row with a null
    // end date is the employee's current assignment.
    async fn position_history_for(
        &self,
        employee_id: &str,
    ) -> Result<Vec<PositionHistory>, StoreError>;
    async fn add_position_history(&self, entry: PositionHistory) -> Result<(), StoreError>;
    async fn close_open_position(
        &self,
        employee_id: &str,
        end_date: NaiveDate,
    ) -> Result<(), StoreError>;
    async fn delete_position_history_for(&self, employee_id: &str) -> Result<(), StoreError>;

    // Leave requests
    async fn list_leave_requests(&self) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn find_leave_request(&self, id: &str) -> Result<Option<LeaveRequest>, StoreError>;
    async fn create_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError>;
    async fn update_leave_request(&self, request: LeaveRequest) -> Result<(), StoreError>;

    // Attendance
    async fn list_attendance(
        &self,
        date: Option<NaiveDate>,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;
    async fn add_attendance(&self, records: Vec<AttendanceRecord>) -> Result<(), StoreError>;

    // Payslips
    async fn list_payslips(&self, period: Option<&str>) -> Result<Vec<Payslip>, StoreError>;
    async fn payroll_periods(&self) -> Result<Vec<String>, StoreError>;
    async fn add_payslips(&self, slips: Vec<Payslip>) -> Result<(), StoreError>;

    // Payroll components
    async fn list_payroll_components(&self) -> Result<Vec<PayrollComponent>, StoreError>;
    async fn create_payroll_component(
        &self,
        component: PayrollComponent,
    ) -> Result<(), StoreError>;
    async fn update_payroll_component(
        &self,
        component: PayrollComponent,
    ) -> Result<(), StoreError>;
    async fn delete_payroll_component(&self, id: &str) -> Result<(), StoreError>;

    // Per-employee salary assignments
    async fn list_salary_components(&self) -> Result<Vec<EmployeeSalaryComponent>, StoreError>;
    async fn salary_components_for(
        &self,
        employee_id: &str,
    ) -> Result<Vec<EmployeeSalaryComponent>, StoreError>;
    async fn replace_salary_components(
        &self,
        employee_id: &str,
        rows: Vec<EmployeeSalaryComponent>,
    ) -> Result<(), StoreError>;

    // KPIs
    async fn list_kpis(&self) -> Result<Vec<Kpi>, StoreError>;
    async fn create_kpi(&self, kpi: Kpi) -> Result<(), StoreError>;
    async fn update_kpi(&self, kpi: Kpi) -> Result<(), StoreError>;
    async fn delete_kpi(&self, id: &str) -> Result<(), StoreError>;

    // Master data
    async fn list_positions(&self) -> Result<Vec<Position>, StoreError>;
    async fn create_position(&self, position: Position) -> Result<(), StoreError>;
    async fn update_position(&self, position: Position) -> Result<(), StoreError>;
    async fn delete_position(&self, id: &str) -> Result<(), StoreError>;

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError>;
    async fn create_unit(&self, unit: Unit) -> Result<(), StoreError>;
    async fn update_unit(&self, unit: Unit) -> Result<(), StoreError>;
    async fn delete_unit(&self, id: &str) -> Result<(), StoreError>;

    async fn list_leave_types(&self) -> Result<Vec<LeaveType>, StoreError>;
    async fn create_leave_type(&self, leave_type: LeaveType) -> Result<(), StoreError>;
    async fn update_leave_type(&self, leave_type: LeaveType) -> Result<(), StoreError>;
    async fn delete_leave_type(&self, id: &str) -> Result<(), StoreError>;

    async fn list_partner_banks(&self) -> Result<Vec<PartnerBank>, StoreError>;
    async fn create_partner_bank(&self, bank: PartnerBank) -> Result<(), StoreError>;
    async fn update_partner_bank(&self, bank: PartnerBank) -> Result<(), StoreError>;
    async fn delete_partner_bank(&self, id: &str) -> Result<(), StoreError>;

    // Accounts. Emails are matched case-insensitively, `save_user` upserts.
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn save_user(&self, user: User) -> Result<(), StoreError>;

    // Keyed settings documents, stored as raw JSON
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put_setting(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Drops every record except the settings documents. Used before
    /// loading the sample dataset.
    async fn clear_all(&self) -> Result<(), StoreError>;
}
