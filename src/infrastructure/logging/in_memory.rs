use crate::core::errors::LedgerError;
use crate::core::models::{AppLog, UserId};
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps the most recent `retention` entries.
#[derive(Clone)]
pub struct InMemoryLogging {
    logs: Arc<RwLock<VecDeque<AppLog>>>,
    retention: usize,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::with_retention(10_000)
    }

    pub fn with_retention(retention: usize) -> Self {
        InMemoryLogging {
            logs: Arc::new(RwLock::new(VecDeque::new())),
            retention: retention.max(1),
        }
    }
}

impl Default for InMemoryLogging {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<UserId>,
    ) -> Result<(), LedgerError> {
        if !details.is_object() {
            return Err(LedgerError::LoggingError(format!(
                "Log details for {} must be a JSON object",
                action
            )));
        }
        let mut logs = self.logs.write().await;
        if logs.len() >= self.retention {
            logs.pop_front();
        }
        logs.push_back(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id,
            details,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, LedgerError> {
        let logs = self.logs.read().await;
        Ok(logs.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn drops_oldest_entries_past_retention() {
        let logging = InMemoryLogging::with_retention(2);
        for n in 0..3 {
            logging.log_action("ACTION", json!({ "n": n }), Some(1)).await.unwrap();
        }
        let logs = logging.get_logs().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].details["n"], 1);
        assert_eq!(logs[1].details["n"], 2);
    }

    #[tokio::test]
    async fn rejects_non_object_details() {
        let logging = InMemoryLogging::new();
        let result = logging.log_action("ACTION", json!([1, 2]), None).await;
        assert!(matches!(result, Err(LedgerError::LoggingError(_))));
    }
}
