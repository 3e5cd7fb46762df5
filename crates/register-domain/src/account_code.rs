use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Chart-of-accounts entry linking an asset account to its depreciation
/// and charge accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountCode {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    pub depreciation_account: String,
    pub charge_account: String,
    pub created_at: DateTime<Utc>,
}

impl AccountCode {
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        depreciation_account: impl Into<String>,
        charge_account: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            label: label.into(),
            depreciation_account: depreciation_account.into(),
            charge_account: charge_account.into(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for AccountCode {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Coded for AccountCode {
    fn code(&self) -> &str {
        &self.code
    }
}

impl Displayable for AccountCode {
    fn display_label(&self) -> String {
        format!("{} - {}", self.code, self.label)
    }
}
