use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Who started an authorization, parked under the `state` token until the
/// vendor redirects back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAuthState {
    pub user_id: String,
    pub org_id: String,
}

impl PendingAuthState {
    /// Decode a stored record. Anything without both ids is corrupt.
    pub fn decode(raw: &str) -> Result<Self, AppError> {
        #[derive(Deserialize)]
        struct Stored {
            user_id: Option<String>,
            org_id: Option<String>,
        }

        let stored: Stored = serde_json::from_str(raw).map_err(|_| AppError::CorruptState)?;
        match (stored.user_id, stored.org_id) {
            (Some(user_id), Some(org_id)) if !user_id.is_empty() && !org_id.is_empty() => {
                Ok(Self { user_id, org_id })
            }
            _ => Err(AppError::CorruptState),
        }
    }
}
