use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::object_storage;
use crate::settings_cache::SettingsCache;
use crate::store::HrisStore;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    #[schema(example = "surat_dokter.pdf")]
    pub file_name: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
}

/// Any authenticated account may request an upload URL; staff attach
/// leave documents through this same flow.
#[utoipa::path(
    post,
    path = "/api/storage/generate-upload-url",
    request_body = UploadUrlRequest,
    responses(
        (status = 200, description = "Presigned PUT URL, valid for five minutes", body = Object, example = json!({
            "success": true,
            "uploadUrl": "https://hris-bucket.1f2e3d4c.r2.cloudflarestorage.com/1698300000000-surat_dokter.pdf?X-Amz-Signature=...",
            "finalUrl": "https://pub.r2.example.com/1698300000000-surat_dokter.pdf",
            "message": "URL berhasil dibuat."
        }))
    ),
    tag = "Storage",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate_upload_url(
    _auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
    config: web::Data<Config>,
    body: web::Json<UploadUrlRequest>,
) -> Result<HttpResponse, ApiError> {
    let storage = settings.storage(store.get_ref()).await?;
    if !storage.enabled {
        return Ok(HttpResponse::Ok().json(json!({
            "success": false,
            "message": "Penyimpanan Objek R2 tidak diaktifkan.",
        })));
    }

    let key = object_storage::object_key(&body.file_name);
    let upload_url = object_storage::presign_upload(&storage, &key, &body.content_type)
        .await
        .map_err(ApiError::internal)?;
    let final_url = format!("{}/{}", config.public_r2_url, key);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "uploadUrl": upload_url,
        "finalUrl": final_url,
        "message": "URL berhasil dibuat.",
    })))
}
