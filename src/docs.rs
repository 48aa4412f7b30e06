use crate::api::attendance::AttendanceQuery;
use crate::api::employee::EmployeeInput;
use crate::api::kpi::KpiInput;
use crate::api::leave::{LeaveDecision, LeaveInput};
use crate::api::master::{LeaveTypeInput, PartnerBankInput, PositionInput, UnitInput};
use crate::api::payroll::{
    ComponentInput, GeneratePayrollRequest, PayslipQuery, SalaryAssignmentInput,
};
use crate::api::reports::{BankTransferQuery, DateRangeQuery, PeriodQuery};
use crate::api::settings::WhatsappTestRequest;
use crate::api::storage::UploadUrlRequest;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeStatus, PositionHistory};
use crate::model::kpi::{Kpi, KpiStatus};
use crate::model::leave::{LeaveRequest, LeaveStatus};
use crate::model::master::{LeaveType, PartnerBank, Position, Unit};
use crate::model::payroll::{
    ComponentType, EmployeeSalaryComponent, PayItem, PayrollComponent, Payslip,
};
use crate::model::role::Role;
use crate::model::settings::{DatabaseSettings, StorageSettings, WahaSettings, WahaTriggers};
use crate::model::user::PublicUser;
use crate::models::{LoginRequest, LoginResponse, UpdateProfileRequest};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRIS UNUGHA API",
        version = "1.0.0",
        description = r#"
## Human Resource Information System (HRIS)

This API powers the **HRIS** backend of Universitas Nahdlatul Ulama Al Ghazali (UNUGHA) Cilacap.

### 🔹 Key Features
- **Employee Management**
  - Profiles, position history, and spreadsheet import
- **Leave Management**
  - Submit requests, overlap checks, approval with WhatsApp notification
- **Attendance Management**
  - Daily records with spreadsheet import and date filters
- **Payroll Management**
  - Component catalog, per-employee salary assignment, one-click period generation
- **Performance (KPI)**
  - Targets with progress tracking per employee
- **Master Data & Settings**
  - Positions, units, leave types, partner banks, D1/R2/WAHA integration settings
- **Reports**
  - CSV downloads for employees, payroll, bank transfer, and attendance

### 🔐 Security
All endpoints except `/login` require **JWT Bearer authentication**.
The account role (Superadmin, Admin HR, Admin Keuangan, Pegawai) decides which
endpoints answer with data and which refuse with `403`.

### 📦 Response Format
- JSON-based RESTful responses, Indonesian user-facing messages
- Report endpoints stream `text/csv` attachments

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::update_profile,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::position_history,
        crate::api::employee::import_employees,

        crate::api::leave::list_leave_requests,
        crate::api::leave::create_leave_request,
        crate::api::leave::decide_leave_request,

        crate::api::attendance::list_attendance,
        crate::api::attendance::import_attendance,

        crate::api::kpi::list_kpis,
        crate::api::kpi::create_kpi,
        crate::api::kpi::update_kpi,
        crate::api::kpi::delete_kpi,

        crate::api::master::list_positions,
        crate::api::master::create_position,
        crate::api::master::update_position,
        crate::api::master::delete_position,
        crate::api::master::list_units,
        crate::api::master::create_unit,
        crate::api::master::update_unit,
        crate::api::master::delete_unit,
        crate::api::master::list_leave_types,
        crate::api::master::create_leave_type,
        crate::api::master::update_leave_type,
        crate::api::master::delete_leave_type,
        crate::api::master::list_partner_banks,
        crate::api::master::create_partner_bank,
        crate::api::master::update_partner_bank,
        crate::api::master::delete_partner_bank,

        crate::api::payroll::list_payslips,
        crate::api::payroll::payroll_periods,
        crate::api::payroll::generate_payroll,
        crate::api::payroll::list_components,
        crate::api::payroll::create_component,
        crate::api::payroll::update_component,
        crate::api::payroll::delete_component,
        crate::api::payroll::employee_salary_components,
        crate::api::payroll::replace_salary_components,

        crate::api::settings::get_database_settings,
        crate::api::settings::save_database_settings,
        crate::api::settings::test_database_connection,
        crate::api::settings::seed_database,
        crate::api::settings::get_storage_settings,
        crate::api::settings::save_storage_settings,
        crate::api::settings::test_storage_connection,
        crate::api::settings::get_waha_settings,
        crate::api::settings::save_waha_settings,
        crate::api::settings::test_whatsapp,

        crate::api::storage::generate_upload_url,

        crate::api::reports::employees_report,
        crate::api::reports::payroll_report,
        crate::api::reports::bank_transfer_report,
        crate::api::reports::attendance_summary_report
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UpdateProfileRequest,
            PublicUser,
            Role,

            Employee,
            EmployeeStatus,
            PositionHistory,
            EmployeeInput,

            LeaveRequest,
            LeaveStatus,
            LeaveInput,
            LeaveDecision,

            AttendanceRecord,
            AttendanceStatus,
            AttendanceQuery,

            Kpi,
            KpiStatus,
            KpiInput,

            Position,
            Unit,
            LeaveType,
            PartnerBank,
            PositionInput,
            UnitInput,
            LeaveTypeInput,
            PartnerBankInput,

            Payslip,
            PayItem,
            PayrollComponent,
            ComponentType,
            EmployeeSalaryComponent,
            PayslipQuery,
            GeneratePayrollRequest,
            ComponentInput,
            SalaryAssignmentInput,

            DatabaseSettings,
            StorageSettings,
            WahaSettings,
            WahaTriggers,
            WhatsappTestRequest,
            UploadUrlRequest,

            PeriodQuery,
            BankTransferQuery,
            DateRangeQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and profile APIs"),
        (name = "Employees", description = "Employee management APIs"),
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Performance", description = "KPI management APIs"),
        (name = "Master Data", description = "Positions, units, leave types, and partner banks"),
        (name = "Payroll", description = "Payroll generation and component APIs"),
        (name = "Settings", description = "Integration settings APIs"),
        (name = "Storage", description = "Object storage upload APIs"),
        (name = "Reports", description = "CSV report downloads"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
