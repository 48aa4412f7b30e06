//! Master data endpoints backing the settings screens: positions,
//! units, leave types and partner banks. All of them sit behind the
//! settings capability.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::fresh_id;
use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::master::{LeaveType, PartnerBank, Position, Unit};
use crate::model::role::Capability;
use crate::store::HrisStore;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionInput {
    #[schema(example = "Dosen")]
    pub name: String,
    #[schema(example = "Tenaga pengajar.")]
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitInput {
    #[schema(example = "Fakultas Teknik")]
    pub name: String,
    #[schema(example = "Fakultas")]
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveTypeInput {
    #[schema(example = "Cuti Tahunan")]
    pub name: String,
    #[schema(example = 12)]
    pub default_days: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerBankInput {
    #[schema(example = "Bank Mandiri")]
    pub name: String,
    #[schema(example = "008", nullable = true)]
    pub code: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/positions",
    responses((status = 200, description = "All positions", body = Vec<Position>)),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn list_positions(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    Ok(HttpResponse::Ok().json(store.list_positions().await?))
}

#[utoipa::path(
    post,
    path = "/api/positions",
    request_body = PositionInput,
    responses(
        (status = 201, description = "Position created", body = Position),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Nama jabatan wajib diisi."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn create_position(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<PositionInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Nama jabatan wajib diisi."));
    }
    let input = body.into_inner();
    let position = Position {
        id: fresh_id("P"),
        name: input.name,
        description: input.description,
    };
    store.create_position(position.clone()).await?;
    Ok(HttpResponse::Created().json(position))
}

#[utoipa::path(
    put,
    path = "/api/positions/{id}",
    params(("id", Path, description = "Position ID")),
    request_body = PositionInput,
    responses(
        (status = 200, description = "Position updated", body = Position),
        (status = 404, description = "Unknown position", body = Object, example = json!({
            "error": "Data tidak ditemukan."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn update_position(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<PositionInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Nama jabatan wajib diisi."));
    }
    let input = body.into_inner();
    let position = Position {
        id: path.into_inner(),
        name: input.name,
        description: input.description,
    };
    store.update_position(position.clone()).await?;
    Ok(HttpResponse::Ok().json(position))
}

#[utoipa::path(
    delete,
    path = "/api/positions/{id}",
    params(("id", Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position removed", body = Object, example = json!({
            "message": "Jabatan berhasil dihapus."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn delete_position(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    store.delete_position(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Jabatan berhasil dihapus." })))
}

#[utoipa::path(
    get,
    path = "/api/units",
    responses((status = 200, description = "All units", body = Vec<Unit>)),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn list_units(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    Ok(HttpResponse::Ok().json(store.list_units().await?))
}

#[utoipa::path(
    post,
    path = "/api/units",
    request_body = UnitInput,
    responses(
        (status = 201, description = "Unit created", body = Unit),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Kategori wajib dipilih."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn create_unit(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<UnitInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    validate_unit(&body)?;
    let input = body.into_inner();
    let unit = Unit {
        id: fresh_id("U"),
        name: input.name,
        category: input.category,
    };
    store.create_unit(unit.clone()).await?;
    Ok(HttpResponse::Created().json(unit))
}

#[utoipa::path(
    put,
    path = "/api/units/{id}",
    params(("id", Path, description = "Unit ID")),
    request_body = UnitInput,
    responses(
        (status = 200, description = "Unit updated", body = Unit),
        (status = 404, description = "Unknown unit", body = Object, example = json!({
            "error": "Data tidak ditemukan."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn update_unit(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<UnitInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    validate_unit(&body)?;
    let input = body.into_inner();
    let unit = Unit {
        id: path.into_inner(),
        name: input.name,
        category: input.category,
    };
    store.update_unit(unit.clone()).await?;
    Ok(HttpResponse::Ok().json(unit))
}

fn validate_unit(input: &UnitInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("Nama unit wajib diisi."));
    }
    if input.category.trim().is_empty() {
        return Err(ApiError::validation("Kategori wajib dipilih."));
    }
    Ok(())
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    params(("id", Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit removed", body = Object, example = json!({
            "message": "Unit berhasil dihapus."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn delete_unit(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    store.delete_unit(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Unit berhasil dihapus." })))
}

#[utoipa::path(
    get,
    path = "/api/leave-types",
    responses((status = 200, description = "All leave types", body = Vec<LeaveType>)),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn list_leave_types(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    Ok(HttpResponse::Ok().json(store.list_leave_types().await?))
}

#[utoipa::path(
    post,
    path = "/api/leave-types",
    request_body = LeaveTypeInput,
    responses(
        (status = 201, description = "Leave type created", body = LeaveType),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Jumlah hari harus lebih dari 0."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn create_leave_type(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<LeaveTypeInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    validate_leave_type(&body)?;
    let input = body.into_inner();
    let leave_type = LeaveType {
        id: fresh_id("LT"),
        name: input.name,
        default_days: input.default_days,
    };
    store.create_leave_type(leave_type.clone()).await?;
    Ok(HttpResponse::Created().json(leave_type))
}

#[utoipa::path(
    put,
    path = "/api/leave-types/{id}",
    params(("id", Path, description = "Leave type ID")),
    request_body = LeaveTypeInput,
    responses(
        (status = 200, description = "Leave type updated", body = LeaveType),
        (status = 404, description = "Unknown leave type", body = Object, example = json!({
            "error": "Data tidak ditemukan."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn update_leave_type(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<LeaveTypeInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    validate_leave_type(&body)?;
    let input = body.into_inner();
    let leave_type = LeaveType {
        id: path.into_inner(),
        name: input.name,
        default_days: input.default_days,
    };
    store.update_leave_type(leave_type.clone()).await?;
    Ok(HttpResponse::Ok().json(leave_type))
}

fn validate_leave_type(input: &LeaveTypeInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("Nama jenis cuti wajib diisi."));
    }
    if input.default_days <= 0 {
        return Err(ApiError::validation("Jumlah hari harus lebih dari 0."));
    }
    Ok(())
}

#[utoipa::path(
    delete,
    path = "/api/leave-types/{id}",
    params(("id", Path, description = "Leave type ID")),
    responses(
        (status = 200, description = "Leave type removed", body = Object, example = json!({
            "message": "Jenis cuti berhasil dihapus."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn delete_leave_type(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    store.delete_leave_type(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Jenis cuti berhasil dihapus." })))
}

#[utoipa::path(
    get,
    path = "/api/partner-banks",
    responses((status = 200, description = "All partner banks", body = Vec<PartnerBank>)),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn list_partner_banks(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    Ok(HttpResponse::Ok().json(store.list_partner_banks().await?))
}

#[utoipa::path(
    post,
    path = "/api/partner-banks",
    request_body = PartnerBankInput,
    responses(
        (status = 201, description = "Partner bank created", body = PartnerBank),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "error": "Nama bank wajib diisi."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn create_partner_bank(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    body: web::Json<PartnerBankInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Nama bank wajib diisi."));
    }
    let input = body.into_inner();
    let bank = PartnerBank {
        id: fresh_id("BANK"),
        name: input.name,
        code: input.code.filter(|c| !c.is_empty()),
    };
    store.create_partner_bank(bank.clone()).await?;
    Ok(HttpResponse::Created().json(bank))
}

#[utoipa::path(
    put,
    path = "/api/partner-banks/{id}",
    params(("id", Path, description = "Partner bank ID")),
    request_body = PartnerBankInput,
    responses(
        (status = 200, description = "Partner bank updated", body = PartnerBank),
        (status = 404, description = "Unknown bank", body = Object, example = json!({
            "error": "Data tidak ditemukan."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn update_partner_bank(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
    body: web::Json<PartnerBankInput>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Nama bank wajib diisi."));
    }
    let input = body.into_inner();
    let bank = PartnerBank {
        id: path.into_inner(),
        name: input.name,
        code: input.code.filter(|c| !c.is_empty()),
    };
    store.update_partner_bank(bank.clone()).await?;
    Ok(HttpResponse::Ok().json(bank))
}

#[utoipa::path(
    delete,
    path = "/api/partner-banks/{id}",
    params(("id", Path, description = "Partner bank ID")),
    responses(
        (status = 200, description = "Partner bank removed", body = Object, example = json!({
            "message": "Bank berhasil dihapus."
        }))
    ),
    tag = "Master Data",
    security(("bearer_auth" = []))
)]
pub async fn delete_partner_bank(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    store.delete_partner_bank(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Bank berhasil dihapus." })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_category_is_required() {
        let input = UnitInput {
            name: "BAU".into(),
            category: "".into(),
        };
        assert_eq!(
            validate_unit(&input).unwrap_err().to_string(),
            "Kategori wajib dipilih."
        );
    }

    #[test]
    fn leave_type_needs_positive_days() {
        let input = LeaveTypeInput {
            name: "Cuti Tahunan".into(),
            default_days: 0,
        };
        assert_eq!(
            validate_leave_type(&input).unwrap_err().to_string(),
            "Jumlah hari harus lebih dari 0."
        );
    }
}
