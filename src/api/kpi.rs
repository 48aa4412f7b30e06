use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::fresh_id;
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::kpi::{Kpi, KpiStatus};
use crate::model::role::Capability;
use crate::store::HrisStore;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiInput {
    #[schema(example = "E001")]
    pub employee_id: String,
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

impl KpiInput {
    fn validate(&self) -> Result<(), ApiError> {
        if self.employee_id.trim().is_empty() {
            return Err(ApiError::validation(
                "Pegawai wajib dipilih dari daftar pencarian",
            ));
        }
        if self.title.trim().is_empty() {
            return Err(ApiError::validation("Judul KPI wajib diisi."));
        }
        if !(0..=100).contains(&self.progress) {
            return Err(ApiError::validation("Progres harus antara 0 dan 100."));
        }
        Ok(())
    }
}

#[utoipa::path(
    get,
    path = "/api/kpis",
    responses(
        (status = 200, description = "All performance indicators", body = Vec<Kpi>)
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_kpis(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Performance)?;
    let kpis = store.list_kpis().await?;
    Ok(HttpResponse::Ok().json(kpis))
}

#[utoipa::path(
    post,
    path = "/api/kpis",
    request_body = KpiInput,
    responses(
        (status = 201, description = "Indicator created", body = Kpi),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Judul KPI wajib diisi."
        }))
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_kpi(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<KpiInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Performance)?;
    body.validate()?;

    let employee = store
        .find_employee(&body.employee_id)
        .await?
        .ok_or_else(|| ApiError::validation("Pegawai wajib dipilih dari daftar pencarian"))?;

    let input = body.into_inner();
    let kpi = Kpi {
        id: fresh_id("K"),
        employee_id: employee.id,
        employee_name: employee.name,
        title: input.title,
        target: input.target,
        actual: input.actual,
        progress: input.progress,
        period: input.period,
        status: input.status,
    };
    store.create_kpi(kpi.clone()).await?;
    Ok(HttpResponse::Created().json(kpi))
}

#[utoipa::path(
    put,
    path = "/api/kpis/{id}",
    params(
        ("id", Path, description = "KPI ID")
    ),
    request_body = KpiInput,
    responses(
        (status = 200, description = "Indicator updated", body = Kpi),
        (status = 404, description = "Unknown indicator", body = Object, example = json!({
            "error": "Data tidak ditemukan."
        }))
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_kpi(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<KpiInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Performance)?;
    body.validate()?;

    let employee = store
        .find_employee(&body.employee_id)
        .await?
        .ok_or_else(|| ApiError::validation("Pegawai wajib dipilih dari daftar pencarian"))?;

    let input = body.into_inner();
    let kpi = Kpi {
        id: path.into_inner(),
        employee_id: employee.id,
        employee_name: employee.name,
        title: input.title,
        target: input.target,
        actual: input.actual,
        progress: input.progress,
        period: input.period,
        status: input.status,
    };
    store.update_kpi(kpi.clone()).await?;
    Ok(HttpResponse::Ok().json(kpi))
}

#[utoipa::path(
    delete,
    path = "/api/kpis/{id}",
    params(
        ("id", Path, description = "KPI ID")
    ),
    responses(
        (status = 200, description = "Indicator removed", body = Object, example = json!({
            "message": "Data KPI berhasil dihapus."
        })),
        (status = 404, description = "Unknown indicator", body = Object, example = json!({
            "error": "Data tidak ditemukan."
        }))
    ),
    tag = "Performance",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_kpi(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Performance)?;
    store.delete_kpi(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Data KPI berhasil dihapus." })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> KpiInput {
        KpiInput {
            employee_id: "E001".into(),
            title: "Publikasi Jurnal".into(),
            target: "2 Jurnal/Semester".into(),
            actual: "1 Jurnal".into(),
            progress: 50,
            period: "Semester Ganjil 2023".into(),
            status: KpiStatus::OnTrack,
        }
    }

    #[test]
    fn progress_bounds_are_inclusive() {
        let mut kpi = input();
        kpi.progress = 0;
        assert!(kpi.validate().is_ok());
        kpi.progress = 100;
        assert!(kpi.validate().is_ok());
        kpi.progress = 101;
        assert_eq!(
            kpi.validate().unwrap_err().to_string(),
            "Progres harus antara 0 dan 100."
        );
    }

    #[test]
    fn title_is_required() {
        let mut kpi = input();
        kpi.title = String::new();
        assert_eq!(
            kpi.validate().unwrap_err().to_string(),
            "Judul KPI wajib diisi."
        );
    }
}
