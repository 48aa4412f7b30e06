use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "E001",
        "name": "Ahmad Dahlan",
        "nip": "198503152010011001",
        "position": "Dosen",
        "unit": "Fakultas Teknik",
        "email": "ahmad.d@unugha.ac.id",
        "whatsappNumber": "6281234567891",
        "status": "Active",
        "avatarUrl": "https://i.pravatar.cc/150?u=E001",
        "joinDate": "2010-01-15",
        "bankName": "Bank Mandiri",
        "accountNumber": "1234567890"
    })
)]
pub struct Employee {
    #[schema(example = "E001")]
    pub id: String,

    #[schema(example = "Ahmad Dahlan")]
    pub name: String,

    #[schema(example = "198503152010011001")]
    pub nip: String,

    #[schema(example = "Dosen")]
    pub position: String,

    #[schema(example = "Fakultas Teknik")]
    pub unit: String,

    #[schema(example = "ahmad.d@unugha.ac.id", format = "email")]
    pub email: String,

    #[schema(example = "6281234567891")]
    pub whatsapp_number: String,

    #[schema(example = "Active")]
    pub status: EmployeeStatus,

    #[schema(example = "https://i.pravatar.cc/150?u=E001")]
    pub avatar_url: String,

    #[schema(example = "2010-01-15", value_type = String, format = "date")]
    pub join_date: NaiveDate,

    #[schema(example = "Bank Mandiri")]
    pub bank_name: String,

    #[schema(example = "1234567890")]
    pub account_number: String,
}

/// One row in an employee's career timeline. An open row (`end_date`
/// = NULL) is the position the employee currently holds; each employee
/// has at most one open row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionHistory {
    #[schema(example = "PH001")]
    pub id: String,

    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(example = "Staf Pengajar")]
    pub position: String,

    #[schema(example = "Fakultas Teknik")]
    pub unit: String,

    #[schema(example = "2010-01-15", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2014-12-31", value_type = Option<String>, format = "date", nullable = true)]
    pub end_date: Option<NaiveDate>,
}
