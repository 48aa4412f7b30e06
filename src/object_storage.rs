//! Cloudflare R2 access over the S3 API. Clients are built per request
//! from the stored storage settings, so credential changes take effect
//! without a restart.

use std::time::Duration;

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use chrono::Utc;

use crate::model::settings::StorageSettings;

/// Presigned upload URLs stay valid for five minutes.
const UPLOAD_URL_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct StorageError(pub String);

fn client(settings: &StorageSettings) -> Client {
    let credentials = Credentials::new(
        settings.access_key_id.clone(),
        settings.secret_access_key.clone(),
        None,
        None,
        "r2-settings",
    );
    let config = Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("auto"))
        .endpoint_url(format!(
            "https://{}.r2.cloudflarestorage.com",
            settings.account_id
        ))
        .credentials_provider(credentials)
        .build();
    Client::from_conf(config)
}

/// Object key for an upload: millisecond timestamp plus the file name
/// with whitespace collapsed to underscores.
pub fn object_key(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), safe)
}

/// Presigns a PUT for the given key. The upload must carry the same
/// content type the URL was signed with.
pub async fn presign_upload(
    settings: &StorageSettings,
    key: &str,
    content_type: &str,
) -> Result<String, StorageError> {
    let presigning = PresigningConfig::expires_in(UPLOAD_URL_TTL)
        .map_err(|e| StorageError(e.to_string()))?;
    let presigned = client(settings)
        .put_object()
        .bucket(&settings.bucket_name)
        .key(key)
        .content_type(content_type)
        .presigned(presigning)
        .await
        .map_err(|e| StorageError(DisplayErrorContext(&e).to_string()))?;
    Ok(presigned.uri().to_string())
}

/// Cheapest request that proves the credentials can reach the bucket.
pub async fn check_bucket(settings: &StorageSettings) -> Result<(), StorageError> {
    client(settings)
        .list_objects_v2()
        .bucket(&settings.bucket_name)
        .max_keys(1)
        .send()
        .await
        .map_err(|e| StorageError(DisplayErrorContext(&e).to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_replaces_whitespace() {
        let key = object_key("surat keterangan\tdokter.pdf");
        assert!(key.ends_with("-surat_keterangan_dokter.pdf"));
        let (stamp, _) = key.split_once('-').unwrap();
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn object_key_keeps_clean_names() {
        let key = object_key("slip.pdf");
        assert!(key.ends_with("-slip.pdf"));
    }
}
