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
pub enum KpiStatus {
    #[serde(rename = "On Track")]
    #[sqlx(rename = "On Track")]
    #[strum(serialize = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    #[sqlx(rename = "At Risk")]
    #[strum(serialize = "At Risk")]
    AtRisk,
    Completed,
}

/// A performance indicator for one employee over a review period.
/// Target and actual are free text; progress is a 0-100 percentage.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "K001",
        "employeeId": "E001",
        "employeeName": "Ahmad Dahlan",
        "title": "Publikasi Jurnal",
        "target": "2 Jurnal/Semester",
        "actual": "1 Jurnal",
        "progress": 50,
        "period": "Semester Ganjil 2023",
        "status": "On Track"
    })
)]
pub struct Kpi {
    #[schema(example = "K001")]
    pub id: String,

    #[schema(example = "E001")]
    pub employee_id: String,

    #[schema(example = "Ahmad Dahlan")]
    pub employee_name: String,

    #[schema(example = "Publikasi Jurnal")]
    pub title: String,

    #[schema(example = "2 Jurnal/Semester")]
    pub target: String,

    #[schema(example = "1 Jurnal")]
    pub actual: String,

    #[schema(example = 50, minimum = 0, maximum = 100)]
    pub progress: i32,

    #[schema(example = "Semester Ganjil 2023")]
    pub period: String,

    #[schema(example = "On Track")]
    pub status: KpiStatus,
}
