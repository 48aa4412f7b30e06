use actix_web::{HttpResponse, web};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::fresh_id;
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::payroll::{
    ComponentType, EmployeeSalaryComponent, PayrollComponent, Payslip, build_payslips,
    sort_periods_desc,
};
use crate::model::role::Capability;
use crate::notify::{Notifier, payslip_issued_message};
use crate::settings_cache::SettingsCache;
use crate::store::HrisStore;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayslipQuery {
    #[schema(example = "Oktober 2023")]
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePayrollRequest {
    #[schema(example = "November 2023")]
    pub period: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInput {
    #[schema(example = "Tunjangan Transportasi")]
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "Earning")]
    pub kind: ComponentType,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryAssignmentInput {
    #[schema(example = "PC001")]
    pub component_id: String,
    #[schema(example = 5000000)]
    pub amount: i64,
}

#[utoipa::path(
    get,
    path = "/api/payslips",
    params(
        ("period", Query, description = "Only slips of this period label")
    ),
    responses(
        (status = 200, description = "Payslips; staff accounts only see their own", body = Vec<Payslip>)
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_payslips(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    query: web::Query<PayslipQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut slips = store.list_payslips(query.period.as_deref()).await?;

    if !auth.role.can(Capability::Payroll) {
        auth.require(Capability::PayrollInfo)?;
        let own_id = store
            .find_employee_by_email(&auth.email)
            .await?
            .map(|e| e.id);
        slips.retain(|s| Some(&s.employee_id) == own_id.as_ref());
    }
    Ok(HttpResponse::Ok().json(slips))
}

#[utoipa::path(
    get,
    path = "/api/payroll/periods",
    responses(
        (status = 200, description = "Known period labels, newest first", body = Vec<String>, example = json!([
            "November 2023", "Oktober 2023", "September 2023"
        ]))
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn payroll_periods(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    if !auth.role.can(Capability::Payroll) {
        auth.require(Capability::PayrollInfo)?;
    }
    let mut periods = store.payroll_periods().await?;
    sort_periods_desc(&mut periods);
    Ok(HttpResponse::Ok().json(periods))
}

#[utoipa::path(
    post,
    path = "/api/payroll/generate",
    request_body = GeneratePayrollRequest,
    responses(
        (status = 200, description = "Slips generated and notifications fanned out", body = Object, example = json!({
            "success": true,
            "message": "Proses selesai. 4 dari 5 notifikasi berhasil dikirim.",
            "generated": 5,
            "sent": 4,
            "failed": 1
        })),
        (status = 409, description = "Period already generated", body = Object, example = json!({
            "error": "Payroll untuk periode November 2023 sudah pernah di-generate."
        }))
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate_payroll(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    notifier: web::Data<dyn Notifier>,
    settings: web::Data<SettingsCache>,
    body: web::Json<GeneratePayrollRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Payroll)?;
    let period = body.period.trim().to_string();
    if period.is_empty() {
        return Err(ApiError::validation("Periode wajib diisi."));
    }

    let existing = store.list_payslips(Some(&period)).await?;
    if !existing.is_empty() {
        return Err(ApiError::conflict(format!(
            "Payroll untuk periode {period} sudah pernah di-generate."
        )));
    }

    let employees = store.list_employees().await?;
    let components = store.list_payroll_components().await?;
    let salary_components = store.list_salary_components().await?;
    let slips = build_payslips(&period, &employees, &components, &salary_components);
    let generated = slips.len();
    store.add_payslips(slips.clone()).await?;
    info!(period = %period, generated, "Payroll generated");

    let waha = settings.waha(store.get_ref()).await?;
    if !waha.enabled || !waha.triggers.payslip_issued {
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Proses generate selesai. Notifikasi WA nonaktif.",
            "generated": generated,
            "sent": 0,
            "failed": 0,
        })));
    }

    let sends = slips.iter().map(|slip| {
        let recipient = employees
            .iter()
            .find(|e| e.id == slip.employee_id)
            .filter(|e| !e.whatsapp_number.is_empty());
        let waha = &waha;
        let notifier = &notifier;
        async move {
            let Some(employee) = recipient else {
                return false;
            };
            let message = payslip_issued_message(&employee.name, &slip.period);
            match notifier
                .send_message(waha, &employee.whatsapp_number, &message)
                .await
            {
                Ok(_) => true,
                Err(e) => {
                    error!(error = %e, employee_id = %employee.id, "Failed to send payslip notification");
                    false
                }
            }
        }
    });
    let sent = join_all(sends).await.into_iter().filter(|ok| *ok).count();
    let failed = generated - sent;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Proses selesai. {sent} dari {generated} notifikasi berhasil dikirim."),
        "generated": generated,
        "sent": sent,
        "failed": failed,
    })))
}

#[utoipa::path(
    get,
    path = "/api/payroll-components",
    responses(
        (status = 200, description = "Component catalog", body = Vec<PayrollComponent>)
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_components(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    if !auth.role.can(Capability::Payroll) {
        auth.require(Capability::Settings)?;
    }
    Ok(HttpResponse::Ok().json(store.list_payroll_components().await?))
}

#[utoipa::path(
    post,
    path = "/api/payroll-components",
    request_body = ComponentInput,
    responses(
        (status = 201, description = "Component created", body = PayrollComponent),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Nama komponen wajib diisi."
        }))
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_component(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<ComponentInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Payroll)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Nama komponen wajib diisi."));
    }
    let input = body.into_inner();
    let component = PayrollComponent {
        id: fresh_id("PC"),
        name: input.name,
        kind: input.kind,
    };
    store.create_payroll_component(component.clone()).await?;
    Ok(HttpResponse::Created().json(component))
}

#[utoipa::path(
    put,
    path = "/api/payroll-components/{id}",
    params(
        ("id", Path, description = "Component ID")
    ),
    request_body = ComponentInput,
    responses(
        (status = 200, description = "Component updated", body = PayrollComponent),
        (status = 404, description = "Unknown component", body = Object, example = json!({
            "error": "Data tidak ditemukan."
        }))
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_component(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<ComponentInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Payroll)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Nama komponen wajib diisi."));
    }
    let input = body.into_inner();
    let component = PayrollComponent {
        id: path.into_inner(),
        name: input.name,
        kind: input.kind,
    };
    store.update_payroll_component(component.clone()).await?;
    Ok(HttpResponse::Ok().json(component))
}

#[utoipa::path(
    delete,
    path = "/api/payroll-components/{id}",
    params(
        ("id", Path, description = "Component ID")
    ),
    responses(
        (status = 200, description = "Component removed; existing slips keep their itemized amounts", body = Object, example = json!({
            "message": "Komponen berhasil dihapus."
        }))
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_component(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Payroll)?;
    store.delete_payroll_component(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Komponen berhasil dihapus." })))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}/salary-components",
    params(
        ("id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Component amounts assigned to the employee", body = Vec<EmployeeSalaryComponent>)
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn employee_salary_components(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    if !auth.role.can(Capability::Payroll) {
        auth.require(Capability::Settings)?;
    }
    let rows = store.salary_components_for(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}/salary-components",
    params(
        ("id", Path, description = "Employee ID")
    ),
    request_body = Vec<SalaryAssignmentInput>,
    responses(
        (status = 200, description = "Assignments replaced", body = Object, example = json!({
            "message": "Perubahan berhasil disimpan!"
        })),
        (status = 404, description = "Unknown employee", body = Object, example = json!({
            "error": "Pegawai tidak ditemukan."
        }))
    ),
    tag = "Payroll",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn replace_salary_components(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<Vec<SalaryAssignmentInput>>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let employee_id = path.into_inner();
    store
        .find_employee(&employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pegawai tidak ditemukan."))?;

    let rows = body
        .into_inner()
        .into_iter()
        .map(|input| EmployeeSalaryComponent {
            employee_id: employee_id.clone(),
            component_id: input.component_id,
            amount: input.amount,
        })
        .collect();
    store.replace_salary_components(&employee_id, rows).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Perubahan berhasil disimpan!" })))
}
