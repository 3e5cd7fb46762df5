//! Register aggregate holding every record kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    account_code::AccountCode, asset::Asset, common::Coded, family::Family, location::Location,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Register {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub families: Vec<Family>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub account_codes: Vec<AccountCode>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Register::schema_version_default")]
    pub schema_version: u8,
}

impl Register {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            families: Vec::new(),
            locations: Vec::new(),
            account_codes: Vec::new(),
            assets: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_family(&mut self, family: Family) -> Uuid {
        let id = family.id;
        self.families.push(family);
        self.touch();
        id
    }

    pub fn add_location(&mut self, location: Location) -> Uuid {
        let id = location.id;
        self.locations.push(location);
        self.touch();
        id
    }

    pub fn add_account_code(&mut self, account: AccountCode) -> Uuid {
        let id = account.id;
        self.account_codes.push(account);
        self.touch();
        id
    }

    pub fn add_asset(&mut self, asset: Asset) -> Uuid {
        let id = asset.id;
        self.assets.push(asset);
        self.touch();
        id
    }

    pub fn family(&self, code: &str) -> Option<&Family> {
        self.families.iter().find(|family| family.has_code(code))
    }

    pub fn family_mut(&mut self, code: &str) -> Option<&mut Family> {
        self.families.iter_mut().find(|family| family.has_code(code))
    }

    pub fn location(&self, code: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.has_code(code))
    }

    pub fn location_mut(&mut self, code: &str) -> Option<&mut Location> {
        self.locations
            .iter_mut()
            .find(|location| location.has_code(code))
    }

    pub fn account_code(&self, code: &str) -> Option<&AccountCode> {
        self.account_codes
            .iter()
            .find(|account| account.has_code(code))
    }

    pub fn account_code_mut(&mut self, code: &str) -> Option<&mut AccountCode> {
        self.account_codes
            .iter_mut()
            .find(|account| account.has_code(code))
    }

    pub fn asset(&self, code: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.has_code(code))
    }

    pub fn asset_mut(&mut self, code: &str) -> Option<&mut Asset> {
        self.assets.iter_mut().find(|asset| asset.has_code(code))
    }

    pub fn asset_by_id(&self, id: Uuid) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    pub fn total_original_value(&self) -> f64 {
        self.assets.iter().map(|asset| asset.original_value).sum()
    }

    pub fn total_net_book_value(&self) -> f64 {
        self.assets.iter().map(|asset| asset.net_book_value).sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepreciationMethod;

    #[test]
    fn lookups_ignore_code_case() {
        let mut register = Register::new("Lookup");
        register.add_family(Family::new(
            "MOB",
            "MOBILIER",
            DepreciationMethod::StraightLine,
            10,
        ));
        register.add_location(Location::new("SS", "SIEGE SOCIAL"));

        assert!(register.family("mob").is_some());
        assert!(register.location(" ss ").is_some());
        assert!(register.asset("missing").is_none());
    }

    #[test]
    fn legacy_files_default_schema_version() {
        let json = r#"{
            "id": "6f1c1d2e-0000-4000-8000-000000000000",
            "name": "Legacy",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let register: Register = serde_json::from_str(json).unwrap();
        assert_eq!(register.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(register.assets.is_empty());
    }
}
