use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::api::fresh_id;
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::AttendanceRecord;
use crate::model::role::Capability;
use crate::sheet;
use crate::store::HrisStore;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    #[schema(example = "2023-10-26", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    #[schema(example = "E001")]
    pub employee_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(
        ("date", Query, description = "Only records on this date"),
        ("employeeId", Query, description = "Only records of this employee")
    ),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = Vec<AttendanceRecord>)
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_attendance(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Attendance)?;
    let records = store
        .list_attendance(query.date, query.employee_id.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    post,
    path = "/api/attendance/import",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Machine export imported", body = Object, example = json!({
            "message": "120 data presensi berhasil diimpor.",
            "imported": 120
        })),
        (status = 400, description = "Template mismatch or bad row", body = Object, example = json!({
            "error": "Setiap baris harus memiliki 'employeeId' dan 'date'."
        }))
    ),
    tag = "Attendance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn import_attendance(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Attendance)?;
    let rows =
        sheet::parse_attendance_rows(&body).map_err(|e| ApiError::validation(e.to_string()))?;

    // Names are denormalized onto each record the way the reports
    // consume them; ids with no matching employee stay importable.
    let employees = store.list_employees().await?;
    let records: Vec<AttendanceRecord> = rows
        .into_iter()
        .map(|row| {
            let employee_name = employees
                .iter()
                .find(|e| e.id == row.employee_id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| "Nama Tidak Ditemukan".to_string());
            AttendanceRecord {
                id: fresh_id("A"),
                employee_id: row.employee_id,
                employee_name,
                date: row.date,
                clock_in: row.clock_in,
                clock_out: row.clock_out,
                status: row.status,
                shift: row.shift,
            }
        })
        .collect();

    let imported = records.len();
    store.add_attendance(records).await?;
    info!(imported, "Attendance import finished");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{imported} data presensi berhasil diimpor."),
        "imported": imported,
    })))
}
