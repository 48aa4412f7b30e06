use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::model::settings::WahaSettings;

pub const TEST_MESSAGE: &str =
    "[TEST] Pesan ini dikirim dari HRIS UNUGHA untuk menguji koneksi WhatsApp Gateway Anda.";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("WhatsApp notifications are disabled in settings.")]
    Disabled,
    #[error("WAHA endpoint or session name is not configured.")]
    NotConfigured,
    #[error("{0}")]
    Gateway(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Outbound WhatsApp messages. Settings are passed per call because the
/// gateway is reconfigurable at runtime.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message` to a WhatsApp number and returns the gateway
    /// message id.
    async fn send_message(
        &self,
        settings: &WahaSettings,
        recipient: &str,
        message: &str,
    ) -> Result<String, NotifyError>;
}

/// HTTP client for a WAHA (WhatsApp HTTP API) gateway.
pub struct WahaClient {
    http: reqwest::Client,
}

impl WahaClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for WahaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for WahaClient {
    async fn send_message(
        &self,
        settings: &WahaSettings,
        recipient: &str,
        message: &str,
    ) -> Result<String, NotifyError> {
        if !settings.enabled {
            return Err(NotifyError::Disabled);
        }
        if settings.endpoint.is_empty() || settings.session_name.is_empty() {
            return Err(NotifyError::NotConfigured);
        }

        let url = format!(
            "{}/api/sessions/{}/send-message",
            settings.endpoint.trim_end_matches('/'),
            settings.session_name
        );
        let mut request = self.http.post(&url).json(&json!({
            "chatId": format!("{recipient}@c.us"),
            "message": message,
        }));
        if !settings.api_key.is_empty() {
            request = request.header("X-Api-Key", &settings.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error! status: {status}"));
            return Err(NotifyError::Gateway(error));
        }

        let message_id = body
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("sent-{}", chrono::Utc::now().timestamp_millis()));
        Ok(message_id)
    }
}

pub fn payslip_issued_message(employee_name: &str, period: &str) -> String {
    format!(
        "Yth. {employee_name}, slip gaji Anda untuk periode {period} telah terbit. \
         Silakan cek di sistem HRIS UNUGHA."
    )
}

pub fn leave_decision_message(
    employee_name: &str,
    leave_type: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    approved: bool,
) -> String {
    let decision = if approved { "disetujui" } else { "ditolak" };
    format!(
        "Yth. {employee_name}, permintaan cuti Anda ({leave_type}) untuk tanggal \
         {start_date} s/d {end_date} telah {decision}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn disabled_gateway_rejects_without_network() {
        let client = WahaClient::new();
        let settings = WahaSettings::default();
        let err = client
            .send_message(&settings, "6281234567890", "halo")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Disabled));
    }

    #[actix_web::test]
    async fn missing_endpoint_is_reported_before_sending() {
        let client = WahaClient::new();
        let settings = WahaSettings {
            enabled: true,
            ..WahaSettings::default()
        };
        let err = client
            .send_message(&settings, "6281234567890", "halo")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::NotConfigured));
    }

    #[test]
    fn payslip_message_carries_name_and_period() {
        let message = payslip_issued_message("Dr. Ahmad Dahlan, M.Kom.", "Oktober 2023");
        assert_eq!(
            message,
            "Yth. Dr. Ahmad Dahlan, M.Kom., slip gaji Anda untuk periode Oktober 2023 telah \
             terbit. Silakan cek di sistem HRIS UNUGHA."
        );
    }

    #[test]
    fn leave_message_spells_out_the_decision() {
        let start = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 11, 3).unwrap();
        let message =
            leave_decision_message("Siti Aminah, S.E.", "Cuti Tahunan", start, end, false);
        assert_eq!(
            message,
            "Yth. Siti Aminah, S.E., permintaan cuti Anda (Cuti Tahunan) untuk tanggal \
             2023-11-01 s/d 2023-11-03 telah ditolak."
        );
    }
}
