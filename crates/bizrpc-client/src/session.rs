//! Client instance identity
//!
//! Every [`RpcClient`](crate::RpcClient) records when it was built and carries
//! an instance id of the form `#<api_path>-<secs>.<micros>-<nnnnn>` that shows
//! up in its logs.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Immutable identity of one client instance, for logs and correlation.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    created_at: DateTime<Utc>,
    instance_id: String,
}

impl SessionInfo {
    pub fn new(api_path: &str) -> Self {
        let created_at = Utc::now();
        let suffix: u32 = rand::rng().random_range(10000..99000);
        let instance_id = format!(
            "#{}-{}.{:06}-{}",
            api_path,
            created_at.timestamp(),
            created_at.timestamp_subsec_micros(),
            suffix
        );

        Self {
            created_at,
            instance_id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `YYYY-MM-DD HH:MM:SS` in UTC.
    pub fn created_at_string(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}
