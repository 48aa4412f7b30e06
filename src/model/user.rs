use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

/// Account record as stored. The argon2 hash never leaves the server;
/// responses carry [`PublicUser`] instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub email: String,
    pub name: String,
    pub whatsapp_number: String,
    pub avatar_url: String,
    pub role: Role,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[schema(example = "Budi Santoso, S.Kom.")]
    pub name: String,
    #[schema(example = "budi.santoso@unugha.ac.id")]
    pub email: String,
    #[schema(example = "6281234567890")]
    pub whatsapp_number: String,
    pub avatar_url: String,
    pub role: Role,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            name: self.name.clone(),
            email: self.email.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            avatar_url: self.avatar_url.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_projection_never_carries_the_hash() {
        let user = User {
            email: "budi.santoso@unugha.ac.id".into(),
            name: "Budi Santoso, S.Kom.".into(),
            whatsapp_number: "6281234567890".into(),
            avatar_url: "https://i.pravatar.cc/150?u=budi".into(),
            role: Role::AdminSdm,
            password_hash: "$argon2id$v=19$...".into(),
        };
        let json = serde_json::to_value(user.public()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "Admin HR");
        assert_eq!(json["whatsappNumber"], "6281234567890");
    }
}
