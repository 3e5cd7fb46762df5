use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use register_domain::Register;

use crate::CoreError;

/// Describes a persisted backup artifact for a register.
#[derive(Debug, Clone)]
pub struct RegisterBackupInfo {
    pub register: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing registers and backups.
pub trait RegisterStorage: Send + Sync {
    fn save_register(&self, name: &str, register: &Register) -> Result<(), CoreError>;
    fn load_register(&self, name: &str) -> Result<Register, CoreError>;
    fn list_registers(&self) -> Result<Vec<String>, CoreError>;
    fn delete_register(&self, name: &str) -> Result<(), CoreError>;
    fn save_register_to_path(&self, register: &Register, path: &Path) -> Result<(), CoreError>;
    fn load_register_from_path(&self, path: &Path) -> Result<Register, CoreError>;
    fn backup_register(
        &self,
        name: &str,
        register: &Register,
        note: Option<&str>,
    ) -> Result<RegisterBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<RegisterBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &RegisterBackupInfo) -> Result<Register, CoreError>;
}

/// Detects dangling references and other anomalies within a register snapshot.
pub fn register_warnings(register: &Register) -> Vec<String> {
    let families: HashSet<String> = register
        .families
        .iter()
        .map(|family| family.code.to_ascii_uppercase())
        .collect();
    let locations: HashSet<String> = register
        .locations
        .iter()
        .map(|location| location.code.to_ascii_uppercase())
        .collect();
    let mut warnings = Vec::new();
    let mut seen_codes = HashSet::new();

    for asset in &register.assets {
        if !seen_codes.insert(asset.code.to_ascii_uppercase()) {
            warnings.push(format!("asset code {} is used more than once", asset.code));
        }
        if !families.contains(&asset.family_code.to_ascii_uppercase()) {
            warnings.push(format!(
                "asset {} references unknown family {}",
                asset.code, asset.family_code
            ));
        }
        if !locations.contains(&asset.location_code.to_ascii_uppercase()) {
            warnings.push(format!(
                "asset {} references unknown location {}",
                asset.code, asset.location_code
            ));
        }
        if asset.method.is_depreciable() && asset.duration_years == 0 {
            warnings.push(format!(
                "asset {} is depreciable but has no duration",
                asset.code
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use register_domain::{Asset, DepreciationMethod, Family, Location};

    #[test]
    fn reports_dangling_references() {
        let mut register = Register::new("Warnings");
        register.add_family(Family::new("MOB", "MOBILIER", DepreciationMethod::StraightLine, 10));
        register.add_location(Location::new("SS", "SIEGE"));
        let acquired = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        register.add_asset(Asset::new(
            "OK",
            "Chair",
            "mob",
            "SS",
            acquired,
            100.0,
            DepreciationMethod::StraightLine,
            10,
        ));
        register.add_asset(Asset::new(
            "BAD",
            "Lathe",
            "MI",
            "U1",
            acquired,
            100.0,
            DepreciationMethod::DecliningBalance,
            0,
        ));

        let warnings = register_warnings(&register);
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().all(|warning| warning.contains("BAD")));
    }
}
