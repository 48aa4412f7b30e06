use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::api::fresh_id;
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::employee::{Employee, EmployeeStatus, PositionHistory};
use crate::model::role::Capability;
use crate::sheet;
use crate::store::HrisStore;

/// Payload for both create and update. The avatar is server-assigned on
/// create and left untouched on update; profile pictures change through
/// the account profile instead.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[schema(example = "Dr. Ahmad Dahlan, M.Kom.")]
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
    #[schema(example = "2010-01-15", value_type = Option<String>, format = "date")]
    pub join_date: Option<NaiveDate>,
    #[schema(example = "Active")]
    pub status: Option<EmployeeStatus>,
    #[schema(example = "Bank Mandiri")]
    pub bank_name: String,
    #[schema(example = "1234567890")]
    pub account_number: String,
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

impl EmployeeInput {
    /// Field checks in form order; returns the join date once present.
    fn validate(&self) -> Result<NaiveDate, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation("Nama wajib diisi"));
        }
        if self.nip.trim().is_empty() {
            return Err(ApiError::validation("NIP wajib diisi"));
        }
        if self.position.trim().is_empty() {
            return Err(ApiError::validation("Jabatan wajib dipilih"));
        }
        if self.unit.trim().is_empty() {
            return Err(ApiError::validation("Unit wajib dipilih"));
        }
        if !valid_email(&self.email) {
            return Err(ApiError::validation("Format email tidak valid"));
        }
        if self.whatsapp_number.trim().is_empty() {
            return Err(ApiError::validation("Nomor WhatsApp wajib diisi"));
        }
        if !self.whatsapp_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::validation(
                "Format Nomor WhatsApp tidak valid. Harap masukkan angka saja.",
            ));
        }
        let join_date = self
            .join_date
            .ok_or_else(|| ApiError::validation("Tanggal bergabung wajib diisi"))?;
        if self.bank_name.trim().is_empty() {
            return Err(ApiError::validation("Nama bank wajib diisi."));
        }
        if self.account_number.trim().is_empty() {
            return Err(ApiError::validation("Nomor rekening wajib diisi."));
        }
        if !self.account_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::validation("Nomor rekening hanya boleh berisi angka."));
        }
        Ok(join_date)
    }
}

#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = Vec<Employee>),
        (status = 403, description = "Caller lacks the employees capability", body = Object, example = json!({
            "error": "Akses ditolak."
        }))
    ),
    tag = "Employees",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Employees)?;
    let employees = store.list_employees().await?;
    Ok(HttpResponse::Ok().json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Unknown employee", body = Object, example = json!({
            "error": "Pegawai tidak ditemukan."
        }))
    ),
    tag = "Employees",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Employees)?;
    let id = path.into_inner();
    let employee = store
        .find_employee(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pegawai tidak ditemukan."))?;
    Ok(HttpResponse::Ok().json(employee))
}

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "Employee created with an opening career entry", body = Employee),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Nama wajib diisi"
        }))
    ),
    tag = "Employees",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<EmployeeInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Employees)?;
    let join_date = body.validate()?;

    let input = body.into_inner();
    let id = fresh_id("E");
    let employee = Employee {
        id: id.clone(),
        name: input.name,
        nip: input.nip,
        position: input.position,
        unit: input.unit,
        email: input.email,
        whatsapp_number: input.whatsapp_number,
        status: input.status.unwrap_or_default(),
        avatar_url: format!("https://picsum.photos/seed/{id}/100/100"),
        join_date,
        bank_name: input.bank_name,
        account_number: input.account_number,
    };
    store.create_employee(employee.clone()).await?;

    // Opening career entry; stays open until the next reassignment.
    store
        .add_position_history(PositionHistory {
            id: fresh_id("PH-"),
            employee_id: employee.id.clone(),
            position: employee.position.clone(),
            unit: employee.unit.clone(),
            start_date: employee.join_date,
            end_date: None,
        })
        .await?;

    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Employee updated; a position or unit change rolls the career history", body = Employee),
        (status = 404, description = "Unknown employee", body = Object, example = json!({
            "error": "Pegawai tidak ditemukan."
        }))
    ),
    tag = "Employees",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<EmployeeInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Employees)?;
    let id = path.into_inner();
    let existing = store
        .find_employee(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pegawai tidak ditemukan."))?;
    let join_date = body.validate()?;

    let input = body.into_inner();
    let reassigned = existing.position != input.position || existing.unit != input.unit;
    let updated = Employee {
        id: existing.id.clone(),
        name: input.name,
        nip: input.nip,
        position: input.position,
        unit: input.unit,
        email: input.email,
        whatsapp_number: input.whatsapp_number,
        status: input.status.unwrap_or(existing.status),
        avatar_url: existing.avatar_url.clone(),
        join_date,
        bank_name: input.bank_name,
        account_number: input.account_number,
    };
    store.update_employee(updated.clone()).await?;

    if reassigned {
        let today = Utc::now().date_naive();
        store.close_open_position(&updated.id, today).await?;
        store
            .add_position_history(PositionHistory {
                id: fresh_id("PH-"),
                employee_id: updated.id.clone(),
                position: updated.position.clone(),
                unit: updated.unit.clone(),
                start_date: today,
                end_date: None,
            })
            .await?;
        info!(employee_id = %updated.id, position = %updated.position, unit = %updated.unit, "Employee reassigned");
    }

    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee and career history removed", body = Object, example = json!({
            "message": "Pegawai berhasil dihapus."
        })),
        (status = 404, description = "Unknown employee", body = Object, example = json!({
            "error": "Pegawai tidak ditemukan."
        }))
    ),
    tag = "Employees",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Employees)?;
    let id = path.into_inner();
    store
        .find_employee(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pegawai tidak ditemukan."))?;

    store.delete_employee(&id).await?;
    store.delete_position_history_for(&id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Pegawai berhasil dihapus." })))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}/position-history",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Career entries, newest first", body = Vec<PositionHistory>)
    ),
    tag = "Employees",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn position_history(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Employees)?;
    let rows = store.position_history_for(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    post,
    path = "/api/employees/import",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Rows imported", body = Object, example = json!({
            "message": "25 pegawai berhasil diimpor.",
            "imported": 25
        })),
        (status = 400, description = "Template mismatch or bad row", body = Object, example = json!({
            "error": "Header kolom tidak sesuai. Kolom yang hilang: nip, email"
        }))
    ),
    tag = "Employees",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn import_employees(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Employees)?;
    let rows = sheet::parse_employee_rows(&body).map_err(|e| ApiError::validation(e.to_string()))?;

    let imported = rows.len();
    for row in rows {
        let id = fresh_id("E");
        let employee = Employee {
            id: id.clone(),
            name: row.name,
            nip: row.nip,
            position: row.position,
            unit: row.unit,
            email: row.email,
            whatsapp_number: row.whatsapp_number,
            status: row.status,
            avatar_url: format!("https://picsum.photos/seed/{id}/100/100"),
            join_date: row.join_date,
            bank_name: row.bank_name,
            account_number: row.account_number,
        };
        store.create_employee(employee.clone()).await?;
        store
            .add_position_history(PositionHistory {
                id: fresh_id("PH-"),
                employee_id: employee.id,
                position: employee.position,
                unit: employee.unit,
                start_date: employee.join_date,
                end_date: None,
            })
            .await?;
    }

    info!(imported, "Employee import finished");
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("{imported} pegawai berhasil diimpor."),
        "imported": imported,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> EmployeeInput {
        EmployeeInput {
            name: "Budi".into(),
            nip: "123".into(),
            position: "Dosen".into(),
            unit: "Fakultas Teknik".into(),
            email: "budi@unugha.ac.id".into(),
            whatsapp_number: "6281234567890".into(),
            join_date: Some(NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()),
            status: None,
            bank_name: "Bank Mandiri".into(),
            account_number: "1234567890".into(),
        }
    }

    #[test]
    fn complete_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn first_failing_field_wins() {
        let mut bad = input();
        bad.name = "  ".into();
        bad.nip = String::new();
        assert_eq!(bad.validate().unwrap_err().to_string(), "Nama wajib diisi");
    }

    #[test]
    fn whatsapp_number_must_be_digits() {
        let mut bad = input();
        bad.whatsapp_number = "+62 812".into();
        assert_eq!(
            bad.validate().unwrap_err().to_string(),
            "Format Nomor WhatsApp tidak valid. Harap masukkan angka saja."
        );
    }

    #[test]
    fn join_date_is_required() {
        let mut bad = input();
        bad.join_date = None;
        assert_eq!(
            bad.validate().unwrap_err().to_string(),
            "Tanggal bergabung wajib diisi"
        );
    }

    #[test]
    fn account_number_must_be_digits() {
        let mut bad = input();
        bad.account_number = "12-34".into();
        assert_eq!(
            bad.validate().unwrap_err().to_string(),
            "Nomor rekening hanya boleh berisi angka."
        );
    }

    #[test]
    fn email_shapes() {
        assert!(valid_email("a@b.co"));
        assert!(!valid_email("a.b.co"));
        assert!(!valid_email("@b.co"));
        assert!(!valid_email("a@bco"));
    }
}
