use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One externally-sourced record in the normalized shape shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
    pub id: Option<String>,
    pub name: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_modified_time: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub visibility: bool,
}
