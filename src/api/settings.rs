//! Connection settings endpoints. Secrets are write-only: GET responses
//! go through the `redacted` projections, saves replace the stored
//! document wholesale and drop the cache entry.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::role::Capability;
use crate::model::settings::{
    DATABASE_SETTINGS_KEY, DatabaseSettings, STORAGE_SETTINGS_KEY, StorageSettings,
    WAHA_SETTINGS_KEY, WahaSettings,
};
use crate::notify::{Notifier, TEST_MESSAGE};
use crate::object_storage;
use crate::seed;
use crate::settings_cache::SettingsCache;
use crate::store::HrisStore;

#[derive(Debug, Deserialize, ToSchema)]
pub struct WhatsappTestRequest {
    #[schema(example = "6281234567890")]
    pub recipient: String,
}

#[utoipa::path(
    get,
    path = "/api/settings/database",
    responses(
        (status = 200, description = "Database sync settings without the auth token", body = Object, example = json!({
            "enabled": true,
            "accountId": "1f2e3d4c",
            "databaseId": "hris-db"
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_database_settings(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let database = settings.database(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(database.redacted()))
}

#[utoipa::path(
    post,
    path = "/api/settings/database",
    request_body = DatabaseSettings,
    responses(
        (status = 200, description = "Settings stored", body = Object, example = json!({
            "message": "Pengaturan berhasil disimpan."
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_database_settings(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
    body: web::Json<DatabaseSettings>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let value = serde_json::to_string(&body.into_inner()).map_err(ApiError::internal)?;
    store.put_setting(DATABASE_SETTINGS_KEY, &value).await?;
    settings.invalidate(DATABASE_SETTINGS_KEY).await;
    Ok(HttpResponse::Ok().json(json!({ "message": "Pengaturan berhasil disimpan." })))
}

#[utoipa::path(
    post,
    path = "/api/settings/database/test",
    responses(
        (status = 200, description = "Result of pinging the database with the stored settings", body = Object, example = json!({
            "success": true,
            "message": "Koneksi ke database berhasil."
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn test_database_connection(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let database = settings.database(store.get_ref()).await?;
    if !database.enabled {
        return Ok(HttpResponse::Ok().json(json!({
            "success": false,
            "message": "Gagal: Sinkronisasi harus diaktifkan untuk melakukan tes.",
        })));
    }
    if !database.has_credentials() {
        return Ok(HttpResponse::Ok().json(json!({
            "success": false,
            "message": "Gagal terhubung. Pastikan semua kredensial yang tersimpan benar.",
        })));
    }

    match store.ping().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Koneksi ke database berhasil.",
        }))),
        Err(e) => {
            error!(error = %e, "Database ping failed");
            Ok(HttpResponse::Ok().json(json!({
                "success": false,
                "message": "Gagal terhubung ke database.",
            })))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/database/seed",
    responses(
        (status = 200, description = "Sample dataset copied when sync is enabled", body = Object, example = json!({
            "success": true,
            "message": "✓ Data contoh berhasil disalin ke Cloudflare D1!"
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn seed_database(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let database = settings.database(store.get_ref()).await?;
    if !database.enabled {
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Sinkronisasi nonaktif, proses penyalinan data dilewati.",
        })));
    }

    match seed::load_sample_data(store.get_ref()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "✓ Data contoh berhasil disalin ke Cloudflare D1!",
        }))),
        Err(e) => {
            error!(error = ?e, "Sample data load failed");
            Ok(HttpResponse::Ok().json(json!({
                "success": false,
                "message": "✗ Gagal menyalin data contoh ke D1.",
            })))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/settings/storage",
    responses(
        (status = 200, description = "Object storage settings without the access keys", body = Object, example = json!({
            "enabled": true,
            "accountId": "1f2e3d4c",
            "bucketName": "hris-bucket"
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_storage_settings(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let storage = settings.storage(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(storage.redacted()))
}

#[utoipa::path(
    post,
    path = "/api/settings/storage",
    request_body = StorageSettings,
    responses(
        (status = 200, description = "Settings stored", body = Object, example = json!({
            "message": "Pengaturan penyimpanan berhasil disimpan."
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_storage_settings(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
    body: web::Json<StorageSettings>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let value = serde_json::to_string(&body.into_inner()).map_err(ApiError::internal)?;
    store.put_setting(STORAGE_SETTINGS_KEY, &value).await?;
    settings.invalidate(STORAGE_SETTINGS_KEY).await;
    Ok(HttpResponse::Ok().json(json!({ "message": "Pengaturan penyimpanan berhasil disimpan." })))
}

#[utoipa::path(
    post,
    path = "/api/settings/storage/test",
    responses(
        (status = 200, description = "Result of listing the bucket with the stored settings", body = Object, example = json!({
            "success": true,
            "message": "Koneksi ke R2 Bucket berhasil."
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn test_storage_connection(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let storage = settings.storage(store.get_ref()).await?;
    if !storage.enabled {
        return Ok(HttpResponse::Ok().json(json!({
            "success": false,
            "message": "Gagal: Penyimpanan R2 harus diaktifkan untuk melakukan tes.",
        })));
    }
    if !storage.has_credentials() {
        return Ok(HttpResponse::Ok().json(json!({
            "success": false,
            "message": "Gagal terhubung. Pastikan semua kredensial R2 yang tersimpan benar.",
        })));
    }

    match object_storage::check_bucket(&storage).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Koneksi ke R2 Bucket berhasil.",
        }))),
        Err(e) => {
            error!(error = %e, "R2 bucket check failed");
            Ok(HttpResponse::Ok().json(json!({
                "success": false,
                "message": "Gagal terhubung ke R2 Bucket.",
            })))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/settings/whatsapp",
    responses(
        (status = 200, description = "Gateway settings; reports key presence instead of the key", body = Object, example = json!({
            "enabled": true,
            "endpoint": "http://localhost:3000",
            "sessionName": "default",
            "hasApiKey": false,
            "triggers": { "leaveApproved": true, "leaveRejected": true, "attendanceReminder": false, "payslipIssued": true }
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_waha_settings(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let waha = settings.waha(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(waha.redacted()))
}

#[utoipa::path(
    post,
    path = "/api/settings/whatsapp",
    request_body = WahaSettings,
    responses(
        (status = 200, description = "Settings stored", body = Object, example = json!({
            "message": "Pengaturan berhasil disimpan!"
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_waha_settings(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
    body: web::Json<WahaSettings>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let value = serde_json::to_string(&body.into_inner()).map_err(ApiError::internal)?;
    store.put_setting(WAHA_SETTINGS_KEY, &value).await?;
    settings.invalidate(WAHA_SETTINGS_KEY).await;
    Ok(HttpResponse::Ok().json(json!({ "message": "Pengaturan berhasil disimpan!" })))
}

#[utoipa::path(
    post,
    path = "/api/settings/whatsapp/test",
    request_body = WhatsappTestRequest,
    responses(
        (status = 200, description = "Test message pushed through the stored gateway settings", body = Object, example = json!({
            "success": true,
            "messageId": "sent-1698300000000",
            "message": "✓ Pesan tes berhasil dikirim ke 6281234567890. (ID: sent-1698300000000)"
        })),
        (status = 400, description = "Recipient is not a bare number", body = Object, example = json!({
            "error": "Silakan masukkan nomor WhatsApp tujuan yang valid (hanya angka)."
        }))
    ),
    tag = "Settings",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn test_whatsapp(
    auth: AuthUser,
    store: web::Data<dyn HrisStore>,
    settings: web::Data<SettingsCache>,
    notifier: web::Data<dyn Notifier>,
    body: web::Json<WhatsappTestRequest>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Capability::Settings)?;
    let recipient = body.recipient.trim();
    if recipient.is_empty() || !recipient.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::validation(
            "Silakan masukkan nomor WhatsApp tujuan yang valid (hanya angka).",
        ));
    }

    let waha = settings.waha(store.get_ref()).await?;
    match notifier.send_message(&waha, recipient, TEST_MESSAGE).await {
        Ok(message_id) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "messageId": message_id,
            "message": format!("✓ Pesan tes berhasil dikirim ke {recipient}. (ID: {message_id})"),
        }))),
        Err(e) => Ok(HttpResponse::Ok().json(json!({
            "success": false,
            "message": format!("✗ Gagal mengirim pesan: {e}"),
        }))),
    }
}
