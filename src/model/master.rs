//! Master data entities managed from the settings screens: positions,
//! organizational units, leave types and partner banks.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[schema(example = "P003")]
    pub id: String,

    #[schema(example = "Dosen")]
    pub name: String,

    #[schema(example = "Tenaga pengajar.")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[schema(example = "U001")]
    pub id: String,

    #[schema(example = "Fakultas Teknik")]
    pub name: String,

    /// Fakultas, Biro, UPT and the like.
    #[schema(example = "Fakultas")]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveType {
    #[schema(example = "LT001")]
    pub id: String,

    #[schema(example = "Cuti Tahunan")]
    pub name: String,

    #[schema(example = 12)]
    pub default_days: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartnerBank {
    #[schema(example = "BANK001")]
    pub id: String,

    #[schema(example = "Bank Mandiri")]
    pub name: String,

    #[schema(example = "008", nullable = true)]
    pub code: Option<String>,
}
