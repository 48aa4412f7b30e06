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
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "L001",
        "employeeId": "E004",
        "employeeName": "Dewi Lestari",
        "leaveType": "Cuti Tahunan",
        "startDate": "2023-10-25",
        "endDate": "2023-10-26",
        "reason": "Acara keluarga",
        "status": "Approved",
        "approver": "Joko Susilo"
    })
)]
pub struct LeaveRequest {
    #[schema(example = "L001")]
    pub id: String,

    #[schema(example = "E004")]
    pub employee_id: String,

    #[schema(example = "Dewi Lestari")]
    pub employee_name: String,

    #[schema(example = "Cuti Tahunan")]
    pub leave_type: String,

    #[schema(example = "2023-10-25", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2023-10-26", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "Acara keluarga")]
    pub reason: String,

    #[schema(example = "Pending")]
    pub status: LeaveStatus,

    /// Name of the user who decided the request; empty until decided.
    #[schema(example = "Joko Susilo", nullable = true)]
    pub approver: Option<String>,

    #[schema(example = "surat_dokter.pdf", nullable = true)]
    pub document_name: Option<String>,

    #[schema(nullable = true)]
    pub document_url: Option<String>,
}

/// True when the candidate range collides with any existing request of
/// the same employee. Dates are inclusive on both ends, so two requests
/// sharing a single day overlap. Rejected requests do not block a new
/// one; Pending and Approved both do.
pub fn has_overlap(
    employee_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[LeaveRequest],
) -> bool {
    existing.iter().any(|req| {
        req.employee_id == employee_id
            && req.status != LeaveStatus::Rejected
            && start_date <= req.end_date
            && end_date >= req.start_date
    })
}
