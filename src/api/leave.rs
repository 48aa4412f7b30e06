use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::fresh_id;
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::leave::{LeaveRequest, LeaveStatus, has_overlap};
use crate::model::role::Capability;
use crate::notify::{Notifier, leave_decision_message};
use crate::settings_cache::SettingsCache;
use crate::store::HrisStore;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveInput {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Cuti Tahunan")]
    pub leave_type: String,
    #[schema(example = "2023-11-01", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2023-11-03", value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "Acara keluarga")]
    pub reason: String,
    #[schema(example = "surat_dokter.pdf", nullable = true)]
    pub document_name: Option<String>,
    #[schema(nullable = true)]
    pub document_url: Option<String>,
}

impl LeaveInput {
    fn validate(&self) -> Result<(NaiveDate, NaiveDate), ApiError> {
        if self.employee_id.trim().is_empty() {
            return Err(ApiError::validation(
                "Pegawai wajib dipilih dari daftar pencarian",
            ));
        }
        if self.leave_type.trim().is_empty() {
            return Err(ApiError::validation("Jenis cuti wajib dipilih"));
        }
        let start = self
            .start_date
            .ok_or_else(|| ApiError::validation("Tanggal mulai wajib diisi"))?;
        let end = self
            .end_date
            .ok_or_else(|| ApiError::validation("Tanggal selesai wajib diisi"))?;
        if self.reason.trim().is_empty() {
            return Err(ApiError::validation("Alasan wajib diisi"));
        }
        if end < start {
            return Err(ApiError::validation(
                "Tanggal selesai tidak boleh sebelum tanggal mulai",
            ));
        }
        Ok((start, end))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveDecision {
    #[schema(example = "Approved")]
    pub status: LeaveStatus,
}

#[utoipa::path(
    get,
    path = "/api/leave-requests",
    responses(
        (status = 200, description = "Leave requests; staff accounts only see their own", body = Vec<LeaveRequest>)
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_leave_requests(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Leave)?;
    let mut requests = store.list_leave_requests().await?;

    if auth.is_staff_account() {
        let own_id = store
            .find_employee_by_email(&auth.email)
            .await?
            .map(|e| e.id);
        requests.retain(|r| Some(&r.employee_id) == own_id.as_ref());
    }
    Ok(HttpResponse::Ok().json(requests))
}

#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body = LeaveInput,
    responses(
        (status = 201, description = "Request submitted as Pending", body = LeaveRequest),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Tanggal selesai tidak boleh sebelum tanggal mulai"
        })),
        (status = 409, description = "Dates collide with an existing request", body = Object, example = json!({
            "error": "Tanggal yang dipilih tumpang tindih dengan pengajuan cuti yang sudah ada."
        }))
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_leave_request(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<LeaveInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Leave)?;
    let (start_date, end_date) = body.validate()?;

    let employee = store
        .find_employee(&body.employee_id)
        .await?
        .ok_or_else(|| ApiError::validation("Pegawai wajib dipilih dari daftar pencarian"))?;

    // Staff accounts may only file for themselves.
    if auth.is_staff_account() && !employee.email.eq_ignore_ascii_case(&auth.email) {
        return Err(ApiError::forbidden("Akses ditolak."));
    }

    let existing = store.list_leave_requests().await?;
    if has_overlap(&employee.id, start_date, end_date, &existing) {
        return Err(ApiError::conflict(
            "Tanggal yang dipilih tumpang tindih dengan pengajuan cuti yang sudah ada.",
        ));
    }

    let input = body.into_inner();
    let request = LeaveRequest {
        id: fresh_id("L"),
        employee_id: employee.id,
        employee_name: employee.name,
        leave_type: input.leave_type,
        start_date,
        end_date,
        reason: input.reason,
        status: LeaveStatus::Pending,
        approver: None,
        document_name: input.document_name.filter(|n| !n.is_empty()),
        document_url: input.document_url.filter(|u| !u.is_empty()),
    };
    store.create_leave_request(request.clone()).await?;
    Ok(HttpResponse::Created().json(request))
}

#[utoipa::path(
    put,
    path = "/api/leave-requests/{id}/status",
    params(
        ("id", Path, description = "Leave request ID")
    ),
    request_body = LeaveDecision,
    responses(
        (status = 200, description = "Decision recorded, requester notified when the gateway allows", body = LeaveRequest),
        (status = 404, description = "Unknown request", body = Object, example = json!({
            "error": "Permohonan tidak ditemukan."
        })),
        (status = 409, description = "Request already decided", body = Object, example = json!({
            "error": "Permohonan sudah diproses."
        }))
    ),
    tag = "Leave",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn decide_leave_request(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    notifier: web::Data<dyn Notifier>,
    settings: web::Data<SettingsCache>,
    path: web::Path<String>,
    body: web::Json<LeaveDecision>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Leave)?;
    if auth.is_staff_account() {
        return Err(ApiError::forbidden("Akses ditolak."));
    }
    if body.status == LeaveStatus::Pending {
        return Err(ApiError::validation("Status tidak valid."));
    }

    let id = path.into_inner();
    let mut request = store
        .find_leave_request(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Permohonan tidak ditemukan."))?;
    if request.status != LeaveStatus::Pending {
        return Err(ApiError::conflict("Permohonan sudah diproses."));
    }

    request.status = body.status;
    request.approver = Some(auth.name.clone());
    store.update_leave_request(request.clone()).await?;
    info!(request_id = %request.id, status = %request.status, approver = %auth.name, "Leave request decided");

    let approved = request.status == LeaveStatus::Approved;
    let waha = settings.waha(store.get_ref()).await?;
    let triggered = if approved {
        waha.triggers.leave_approved
    } else {
        waha.triggers.leave_rejected
    };
    if waha.enabled && triggered {
        match store.find_employee(&request.employee_id).await? {
            Some(employee) if !employee.whatsapp_number.is_empty() => {
                let message = leave_decision_message(
                    &request.employee_name,
                    &request.leave_type,
                    request.start_date,
                    request.end_date,
                    approved,
                );
                if let Err(e) = notifier
                    .send_message(&waha, &employee.whatsapp_number, &message)
                    .await
                {
                    error!(error = %e, request_id = %request.id, "Failed to send leave decision notification");
                }
            }
            _ => {
                error!(request_id = %request.id, "No WhatsApp number on file for leave notification");
            }
        }
    }

    Ok(HttpResponse::Ok().json(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> LeaveInput {
        LeaveInput {
            employee_id: "E001".into(),
            leave_type: "Cuti Tahunan".into(),
            start_date: NaiveDate::from_ymd_opt(2023, 11, 1),
            end_date: NaiveDate::from_ymd_opt(2023, 11, 3),
            reason: "Acara keluarga".into(),
            document_name: None,
            document_url: None,
        }
    }

    #[test]
    fn complete_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn employee_must_be_picked() {
        let mut bad = input();
        bad.employee_id = String::new();
        assert_eq!(
            bad.validate().unwrap_err().to_string(),
            "Pegawai wajib dipilih dari daftar pencarian"
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut bad = input();
        bad.end_date = NaiveDate::from_ymd_opt(2023, 10, 30);
        assert_eq!(
            bad.validate().unwrap_err().to_string(),
            "Tanggal selesai tidak boleh sebelum tanggal mulai"
        );
    }

    #[test]
    fn single_day_leave_is_fine() {
        let mut one_day = input();
        one_day.end_date = one_day.start_date;
        assert!(one_day.validate().is_ok());
    }

    #[test]
    fn reason_is_required() {
        let mut bad = input();
        bad.reason = " ".into();
        assert_eq!(bad.validate().unwrap_err().to_string(), "Alasan wajib diisi");
    }
}
