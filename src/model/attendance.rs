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
pub enum AttendanceStatus {
    #[serde(rename = "On Time")]
    #[sqlx(rename = "On Time")]
    #[strum(serialize = "On Time")]
    OnTime,
    Late,
    Absent,
}

/// One attendance row per employee per day. Clock times are the raw
/// strings from the attendance machine export ("08:00", or "N/A" when
/// the employee never clocked).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "A001",
        "employeeId": "E001",
        "employeeName": "Ahmad Dahlan",
        "date": "2023-10-25",
        "clockIn": "08:00",
        "clockOut": "17:00",
        "status": "On Time",
        "shift": "Regular"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = "A001")]
    pub id: String,

    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(example = "Ahmad Dahlan")]
    pub employee_name: String,

    #[schema(example = "2023-10-25", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "08:00")]
    pub clock_in: String,

    #[schema(example = "17:00")]
    pub clock_out: String,

    #[schema(example = "On Time")]
    pub status: AttendanceStatus,

    #[schema(example = "Regular")]
    pub shift: String,
}
