//! API client answering from JSON files on disk
//!
//! Resource `images/configuration` is served from `<root>/images/configuration.json`.

use async_trait::async_trait;
use picker_core::{ApiClient, ApiError, CurrentUser};
use serde_json::Value;
use std::path::PathBuf;

pub struct FixtureApi {
    root: PathBuf,
    user: CurrentUser,
}

impl FixtureApi {
    pub fn new(root: impl Into<PathBuf>, user_name: &str) -> Self {
        Self {
            root: root.into(),
            user: CurrentUser {
                user_name: user_name.to_string(),
            },
        }
    }

    fn path_for(&self, resource: &str) -> PathBuf {
        let mut path = self.root.clone();
        let segments: Vec<&str> = resource.split('/').filter(|s| !s.is_empty() && *s != "..").collect();
        if let Some((last, dirs)) = segments.split_last() {
            path.extend(dirs);
            path.push(format!("{last}.json"));
        }
        path
    }

    async fn read(&self, resource: &str) -> Result<Value, ApiError> {
        let path = self.path_for(resource);
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ApiError::NotFound(resource.to_string()),
            _ => ApiError::Transport(format!("{}: {}", path.display(), e)),
        })?;

        serde_json::from_str(&content).map_err(|e| ApiError::Status {
            resource: resource.to_string(),
            code: 500,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ApiClient for FixtureApi {
    async fn fetch(&self, resource: &str) -> Result<Value, ApiError> {
        tracing::debug!("GET {}", resource);
        self.read(resource).await
    }

    async fn query(&self, resource: &str, args: &Value) -> Result<Value, ApiError> {
        tracing::debug!("GET {} {}", resource, args);
        self.read(resource).await
    }

    fn current_user(&self) -> CurrentUser {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for() {
        let api = FixtureApi::new("/data", "alice");
        assert_eq!(api.path_for("images/configuration"), PathBuf::from("/data/images/configuration.json"));
        assert_eq!(api.path_for("../secret"), PathBuf::from("/data/secret.json"));
    }

    #[test]
    fn test_path_for_dotted_resource() {
        let api = FixtureApi::new("/data", "alice");
        assert_eq!(api.path_for("images/v1.2"), PathBuf::from("/data/images/v1.2.json"));
        assert_eq!(api.path_for("zones.for.images"), PathBuf::from("/data/zones.for.images.json"));
    }

    #[tokio::test]
    async fn test_fetch_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zones-for-images.json"), r#"[{"id": 1, "name": "Nord"}]"#).unwrap();
        let api = FixtureApi::new(dir.path(), "alice");

        let zones = api.fetch("zones-for-images").await.unwrap();
        assert_eq!(zones[0]["name"], "Nord");
        assert_eq!(api.fetch("images").await.unwrap_err(), ApiError::NotFound("images".into()));
        assert_eq!(api.current_user().user_name, "alice");
    }
}
