use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Physical site where assets are kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            label: label.into(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for Location {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Coded for Location {
    fn code(&self) -> &str {
        &self.code
    }
}

impl Displayable for Location {
    fn display_label(&self) -> String {
        format!("{} - {}", self.code, self.label)
    }
}
