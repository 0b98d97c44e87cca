// Cloudinary-compatible upload API client.
//
// The hosted API accepts multipart POSTs to
// https://api.cloudinary.com/v1_1/<cloud_name>/image/<action> where every
// mutating request carries api_key, timestamp, and a signature over the
// remaining parameters.

use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::MediaConfig;
use crate::media::{MediaError, MediaStore, UploadedImage};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

pub struct CloudinaryStore {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudinaryStore {
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        if config.cloud_name.is_empty() {
            return Err(MediaError::ConfigMissing("CLD_NAME"));
        }
        if config.api_key.is_empty() {
            return Err(MediaError::ConfigMissing("CLD_API_KEY"));
        }
        if config.api_secret.is_empty() {
            return Err(MediaError::ConfigMissing("CLD_API_SECRET"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/{}/image/{}", API_BASE, self.cloud_name, action)
    }

    /// Sign request parameters: sort by name, serialize as k=v joined with
    /// '&', append the API secret, and hex the SHA-256 digest. The api_key,
    /// file, and signature parameters themselves are never part of the
    /// signed string.
    fn signature(params: &[(&str, &str)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);

        let to_sign = sorted
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait::async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, file: &Path, folder: &str) -> Result<UploadedImage, MediaError> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::signature(
            &[("folder", folder), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.action_url("upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::BadResponse(format!("{}: {}", status, body)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::BadResponse(e.to_string()))?;

        Ok(UploadedImage {
            public_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::signature(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("public_id", public_id.to_string())
            .text("signature", signature);

        let response = self
            .client
            .post(self.action_url("destroy"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::BadResponse(format!("{}: {}", status, body)));
        }

        let destroyed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::BadResponse(e.to_string()))?;

        match destroyed.result.as_str() {
            "ok" => Ok(()),
            "not found" => Err(MediaError::NotFound(public_id.to_string())),
            other => Err(MediaError::BadResponse(other.to_string())),
        }
    }
}
