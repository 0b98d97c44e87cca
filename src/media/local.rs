// Filesystem-backed media store for development and integration runs.
//
// Keeps the same contract as the hosted store: upload yields a public_id
// and a durable URL, delete removes the asset by public_id. Assets land
// under <local_dir>/<folder>/<uuid>[.ext].

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::MediaConfig;
use crate::media::{MediaError, MediaStore, UploadedImage};

pub struct LocalStore {
    dir: PathBuf,
    base_url: String,
}

impl LocalStore {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.local_dir),
            base_url: config.local_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn asset_path(&self, public_id: &str) -> PathBuf {
        self.dir.join(public_id)
    }
}

#[async_trait::async_trait]
impl MediaStore for LocalStore {
    async fn upload(&self, file: &Path, folder: &str) -> Result<UploadedImage, MediaError> {
        let mut name = Uuid::new_v4().simple().to_string();
        if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
            name = format!("{}.{}", name, ext);
        }

        let public_id = format!("{}/{}", folder, name);
        let dest = self.asset_path(&public_id);

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(file, &dest).await?;

        Ok(UploadedImage {
            url: format!("{}/{}", self.base_url, public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let path = self.asset_path(public_id);

        if !path.exists() {
            return Err(MediaError::NotFound(public_id.to_string()));
        }

        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> LocalStore {
        LocalStore {
            dir: dir.to_path_buf(),
            base_url: "http://localhost:5000/media".to_string(),
        }
    }

    #[tokio::test]
    async fn upload_copies_file_and_builds_url() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("cat.png");
        tokio::fs::write(&src, b"png-bytes").await.unwrap();

        let store = store(&tmp.path().join("media"));
        let uploaded = store.upload(&src, "gallery").await.unwrap();

        assert!(uploaded.public_id.starts_with("gallery/"));
        assert!(uploaded.public_id.ends_with(".png"));
        assert_eq!(
            uploaded.url,
            format!("http://localhost:5000/media/{}", uploaded.public_id)
        );

        let stored = tokio::fs::read(store.asset_path(&uploaded.public_id))
            .await
            .unwrap();
        assert_eq!(stored, b"png-bytes");
    }

    #[tokio::test]
    async fn delete_removes_asset_and_reports_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("cat.png");
        tokio::fs::write(&src, b"png-bytes").await.unwrap();

        let store = store(&tmp.path().join("media"));
        let uploaded = store.upload(&src, "gallery").await.unwrap();

        store.delete(&uploaded.public_id).await.unwrap();
        assert!(matches!(
            store.delete(&uploaded.public_id).await,
            Err(MediaError::NotFound(_))
        ));
    }
}
