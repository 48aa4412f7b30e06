//! Runtime-editable settings, persisted as JSON values in the settings
//! key/value table. GET endpoints must never echo stored secrets, so
//! each settings type has a `redacted` projection.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// Settings table key for the Cloudflare D1 connection.
pub const DATABASE_SETTINGS_KEY: &str = "d1";
/// Settings table key for the R2 object storage connection.
pub const STORAGE_SETTINGS_KEY: &str = "r2";
/// Settings table key for the WAHA WhatsApp gateway.
pub const WAHA_SETTINGS_KEY: &str = "waha";

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    pub enabled: bool,
    #[schema(example = "1f2e3d4c")]
    pub account_id: String,
    #[schema(example = "hris-db")]
    pub database_id: String,
    /// API token; write-only, never returned by GET.
    pub auth_token: String,
}

impl DatabaseSettings {
    pub fn has_credentials(&self) -> bool {
        !self.account_id.is_empty() && !self.database_id.is_empty() && !self.auth_token.is_empty()
    }

    pub fn redacted(&self) -> Value {
        json!({
            "enabled": self.enabled,
            "accountId": self.account_id,
            "databaseId": self.database_id,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    pub enabled: bool,
    #[schema(example = "1f2e3d4c")]
    pub account_id: String,
    #[schema(example = "hris-bucket")]
    pub bucket_name: String,
    /// Write-only, never returned by GET.
    pub access_key_id: String,
    /// Write-only, never returned by GET.
    pub secret_access_key: String,
}

impl StorageSettings {
    pub fn has_credentials(&self) -> bool {
        !self.account_id.is_empty()
            && !self.bucket_name.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_access_key.is_empty()
    }

    pub fn redacted(&self) -> Value {
        json!({
            "enabled": self.enabled,
            "accountId": self.account_id,
            "bucketName": self.bucket_name,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WahaTriggers {
    pub leave_approved: bool,
    pub leave_rejected: bool,
    pub attendance_reminder: bool,
    pub payslip_issued: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WahaSettings {
    pub enabled: bool,
    #[schema(example = "http://localhost:3000")]
    pub endpoint: String,
    #[schema(example = "default")]
    pub session_name: String,
    /// Optional X-Api-Key for the gateway; write-only.
    pub api_key: String,
    pub triggers: WahaTriggers,
}

impl WahaSettings {
    pub fn redacted(&self) -> Value {
        json!({
            "enabled": self.enabled,
            "endpoint": self.endpoint,
            "sessionName": self.session_name,
            "hasApiKey": !self.api_key.is_empty(),
            "triggers": self.triggers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_redaction_drops_auth_token() {
        let settings = DatabaseSettings {
            enabled: true,
            account_id: "acc".into(),
            database_id: "db".into(),
            auth_token: "super-secret".into(),
        };
        let value = settings.redacted();
        assert!(value.get("authToken").is_none());
        assert_eq!(value["accountId"], "acc");
    }

    #[test]
    fn storage_redaction_drops_keys() {
        let settings = StorageSettings {
            enabled: true,
            account_id: "acc".into(),
            bucket_name: "bucket".into(),
            access_key_id: "akid".into(),
            secret_access_key: "sak".into(),
        };
        let value = settings.redacted();
        assert!(value.get("accessKeyId").is_none());
        assert!(value.get("secretAccessKey").is_none());
        assert_eq!(value["bucketName"], "bucket");
    }

    #[test]
    fn waha_redaction_reports_key_presence_only() {
        let mut settings = WahaSettings::default();
        settings.api_key = "k".into();
        let value = settings.redacted();
        assert!(value.get("apiKey").is_none());
        assert_eq!(value["hasApiKey"], true);
    }

    #[test]
    fn partial_stored_json_parses_with_defaults() {
        let settings: WahaSettings =
            serde_json::from_value(json!({ "enabled": true, "endpoint": "http://w" })).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.session_name, "");
        assert!(!settings.triggers.payslip_issued);
    }
}
