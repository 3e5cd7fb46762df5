use chrono::NaiveDate;
use register_domain::{
    AccountCode, Asset, AssetStatus, DepreciationMethod, Family, Location, Register,
};
use tracing::info;

use crate::CoreError;

/// Record counts and value totals of a register.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterSummary {
    pub name: String,
    pub families: usize,
    pub locations: usize,
    pub account_codes: usize,
    pub assets: usize,
    pub fully_depreciated: usize,
    pub total_original_value: f64,
    pub total_net_book_value: f64,
}

pub struct RegisterService;

impl RegisterService {
    /// Creates an empty register.
    pub fn create(name: impl Into<String>) -> Register {
        Register::new(name)
    }

    /// Renames a register.
    pub fn rename(register: &mut Register, new_name: impl Into<String>) -> Result<(), CoreError> {
        let new_name = new_name.into();
        if new_name.trim().is_empty() {
            return Err(CoreError::Validation("Register name cannot be empty".into()));
        }
        register.name = new_name.trim().to_string();
        register.touch();
        Ok(())
    }

    pub fn summary(register: &Register) -> RegisterSummary {
        RegisterSummary {
            name: register.name.clone(),
            families: register.families.len(),
            locations: register.locations.len(),
            account_codes: register.account_codes.len(),
            assets: register.assets.len(),
            fully_depreciated: register
                .assets
                .iter()
                .filter(|asset| asset.is_fully_depreciated())
                .count(),
            total_original_value: register.total_original_value(),
            total_net_book_value: register.total_net_book_value(),
        }
    }

    /// Fills an empty register with the sample families, locations, account
    /// codes and assets. Returns `false` when the register already has families.
    ///
    /// Assets keep their recorded valuation snapshot; run a refresh to
    /// recompute it for a given date.
    pub fn seed_sample(register: &mut Register) -> bool {
        if !register.families.is_empty() {
            return false;
        }

        let families = [
            ("BI", "BUREAUTIQUE INFORMATIQUE", DepreciationMethod::StraightLine, 3),
            ("IT", "INSTALLATIONS TECHNIQUES", DepreciationMethod::StraightLine, 10),
            ("MI", "MATERIEL INDUSTRIEL", DepreciationMethod::DecliningBalance, 5),
            ("MOB", "MOBILIER", DepreciationMethod::StraightLine, 10),
            ("TER", "TERRAINS", DepreciationMethod::None, 0),
            ("VEH", "VEHICULES", DepreciationMethod::StraightLine, 4),
        ];
        for (code, label, method, years) in families {
            register.add_family(Family::new(code, label, method, years));
        }

        for (code, label) in [
            ("AP", "AGENCE PARIS"),
            ("SS", "SIEGE SOCIAL"),
            ("U1", "USINE 1"),
        ] {
            register.add_location(Location::new(code, label));
        }

        for (code, label, depreciation, charge) in [
            ("201000", "FRAIS D'ETABLISSEMENT", "281000", "687201"),
            ("213100", "FRAIS DE CONSTITUTION", "281100", "687201"),
            ("215400", "MATERIEL INDUSTRIEL", "281540", "681540"),
        ] {
            register.add_account_code(AccountCode::new(code, label, depreciation, charge));
        }

        let assets = [
            (
                "CHF02",
                "FAUTEUILS DE DIRECTION",
                "MOB",
                "SS",
                (1999, 1, 1),
                446.68,
                DepreciationMethod::StraightLine,
                3,
                (446.68, 0.0, AssetStatus::FullyDepreciated),
            ),
            (
                "215400",
                "MATERIEL INDUSTRIEL",
                "MI",
                "U1",
                (2020, 3, 15),
                15_000.0,
                DepreciationMethod::DecliningBalance,
                5,
                (8_750.0, 6_250.0, AssetStatus::InService),
            ),
            (
                "218200",
                "MATERIEL DE TRANSPORT",
                "VEH",
                "AP",
                (2021, 6, 10),
                25_000.0,
                DepreciationMethod::StraightLine,
                4,
                (18_750.0, 6_250.0, AssetStatus::InService),
            ),
        ];
        for (code, label, family, location, (y, m, d), value, method, years, snapshot) in assets {
            let Some(acquired) = NaiveDate::from_ymd_opt(y, m, d) else {
                continue;
            };
            let mut asset = Asset::new(code, label, family, location, acquired, value, method, years);
            let (accumulated, net, status) = snapshot;
            asset.accumulated_depreciation = accumulated;
            asset.net_book_value = net;
            asset.status = status;
            register.add_asset(asset);
        }

        info!(register = %register.name, "sample data seeded");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_fills_empty_register_once() {
        let mut register = RegisterService::create("Sample");
        assert!(RegisterService::seed_sample(&mut register));
        assert_eq!(register.families.len(), 6);
        assert_eq!(register.locations.len(), 3);
        assert_eq!(register.account_codes.len(), 3);
        assert_eq!(register.assets.len(), 3);

        assert!(!RegisterService::seed_sample(&mut register));
        assert_eq!(register.assets.len(), 3);
    }

    #[test]
    fn summary_counts_records() {
        let mut register = RegisterService::create("Sample");
        RegisterService::seed_sample(&mut register);
        let summary = RegisterService::summary(&register);
        assert_eq!(summary.assets, 3);
        assert_eq!(summary.fully_depreciated, 1);
        assert!((summary.total_original_value - 40_446.68).abs() < 1e-6);
        assert!((summary.total_net_book_value - 12_500.0).abs() < 1e-6);
    }

    #[test]
    fn rename_rejects_blank_names() {
        let mut register = RegisterService::create("Sample");
        assert!(RegisterService::rename(&mut register, "   ").is_err());
        RegisterService::rename(&mut register, " Head office ").unwrap();
        assert_eq!(register.name, "Head office");
    }
}
