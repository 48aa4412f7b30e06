use actix_web::{HttpResponse, web};
use tracing::{debug, info, instrument};

use crate::auth::auth::AuthUser;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, UpdateProfileRequest};
use crate::store::HrisStore;

/// Login dengan email dan kata sandi
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login berhasil", body = LoginResponse),
        (status = 401, description = "Email atau kata sandi salah", body = Object, example = json!({
            "error": "Email atau kata sandi salah."
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(store, config, body), fields(email = %body.email))]
pub async fn login(
    body: web::Json<LoginRequest>,
    store: web::Data<dyn HrisStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let user = match store.find_user(&body.email).await? {
        Some(user) => user,
        None => {
            info!("Invalid credentials: user not found");
            return Err(ApiError::Unauthorized("Email atau kata sandi salah.".into()));
        }
    };

    if verify_password(&body.password, &user.password_hash).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized("Email atau kata sandi salah.".into()));
    }

    debug!("Password verified, issuing access token");
    let token = generate_access_token(&user, &config.jwt_secret, config.access_token_ttl);

    info!("Login successful");
    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token,
        user: user.public(),
    }))
}

/// Perbarui profil akun yang sedang login
#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profil tersimpan", body = PublicUser),
        (status = 400, description = "Validasi gagal", body = Object, example = json!({
            "error": "Kata sandi saat ini salah."
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn update_profile(
    auth: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    store: web::Data<dyn HrisStore>,
) -> Result<HttpResponse, ApiError> {
    let mut user = store
        .find_user(&auth.email)
        .await?
        .ok_or_else(|| ApiError::not_found("Pengguna tidak ditemukan."))?;

    let body = body.into_inner();

    if let Some(name) = body.name {
        if name.trim().is_empty() {
            return Err(ApiError::validation("Nama wajib diisi."));
        }
        user.name = name;
    }
    if let Some(number) = body.whatsapp_number {
        if number.trim().is_empty() {
            return Err(ApiError::validation("Nomor WhatsApp wajib diisi."));
        }
        if !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::validation("Hanya boleh berisi angka."));
        }
        user.whatsapp_number = number;
    }
    if let Some(avatar_url) = body.avatar_url {
        user.avatar_url = avatar_url;
    }

    if let Some(new_password) = body.new_password {
        let current = body.current_password.unwrap_or_default();
        if current.is_empty() {
            return Err(ApiError::validation("Kata sandi saat ini wajib diisi."));
        }
        if verify_password(&current, &user.password_hash).is_err() {
            return Err(ApiError::validation("Kata sandi saat ini salah."));
        }
        if new_password.is_empty() {
            return Err(ApiError::validation("Kata sandi baru wajib diisi."));
        }
        if new_password.chars().count() < 6 {
            return Err(ApiError::validation("Kata sandi baru minimal 6 karakter."));
        }
        user.password_hash = hash_password(&new_password);
        info!(email = %user.email, "Password changed");
    }

    store.save_user(user.clone()).await?;
    Ok(HttpResponse::Ok().json(user.public()))
}
