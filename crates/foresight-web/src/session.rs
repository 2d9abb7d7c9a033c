use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;

const SESSION_KEY: &str = "foresight";

/// Per-browsing-session state, carried as one typed record instead of loose
/// string keys. Survives across the training-review sequence; the notice and
/// error fields are one-shot (cleared by the render that surfaces them).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Name of the dataset uploaded for the current training attempt.
    pub training_file: Option<String>,
    /// "A swap just happened; the next render of the training page must
    /// show a notice."
    pub changed_model: bool,
    /// Most recent recoverable failure, surfaced once.
    pub error: Option<String>,
}

impl SessionData {
    pub async fn load(session: &Session) -> Result<SessionData, AppError> {
        Ok(session.get::<SessionData>(SESSION_KEY).await?.unwrap_or_default())
    }

    pub async fn store(&self, session: &Session) -> Result<(), AppError> {
        session.insert(SESSION_KEY, self).await?;
        Ok(())
    }

    /// One-shot read of the swap notice.
    pub fn take_notice(&mut self) -> bool {
        std::mem::take(&mut self.changed_model)
    }

    /// One-shot read of the pending error message.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_notice_is_one_shot() {
        let mut data = SessionData::default();
        data.changed_model = true;

        assert!(data.take_notice());
        assert!(!data.take_notice());
        assert!(!data.take_notice());
    }

    #[test]
    fn error_is_one_shot() {
        let mut data = SessionData {
            error: Some("boom".to_string()),
            ..SessionData::default()
        };
        assert_eq!(data.take_error().as_deref(), Some("boom"));
        assert_eq!(data.take_error(), None);
    }

    #[test]
    fn default_record_is_empty() {
        let data = SessionData::default();
        assert!(data.training_file.is_none());
        assert!(!data.changed_model);
        assert!(data.error.is_none());
    }
}
