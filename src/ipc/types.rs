use std::path::PathBuf;
use std::time::Duration;

use rusqlite::Connection;
use serde::Deserialize;

use crate::policy::UploadPolicy;
use crate::ratelimit::RateLimiter;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub policy: UploadPolicy,
    pub uploads: RateLimiter,
}

impl AppState {
    pub fn new() -> Self {
        let policy = UploadPolicy::default();
        let uploads = RateLimiter::new(policy.max_uploads_per_hour, Duration::from_secs(3600));
        Self {
            workspace: None,
            db: None,
            policy,
            uploads,
        }
    }
}
