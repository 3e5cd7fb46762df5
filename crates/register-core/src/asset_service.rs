//! Asset management, schedules and stored valuation snapshots.

use chrono::NaiveDate;
use register_domain::{Asset, AssetStatus, Coded, DepreciationMethod, Register};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    depreciation::{generate_schedule, round_cents, AssetInput, ScheduleEntry},
    validation::{ensure_amount, ensure_unique, normalize_code, normalize_label},
    CoreError,
};

/// User supplied fields for creating or editing an asset.
///
/// `method` and `duration_years` fall back to the family's plan when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDraft {
    pub code: String,
    pub label: String,
    pub family_code: String,
    pub location_code: String,
    pub acquisition_date: NaiveDate,
    pub original_value: f64,
    pub method: Option<DepreciationMethod>,
    pub duration_years: Option<u32>,
}

impl AssetDraft {
    /// Draft pre-filled from an existing asset, ready for partial edits.
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            code: asset.code.clone(),
            label: asset.label.clone(),
            family_code: asset.family_code.clone(),
            location_code: asset.location_code.clone(),
            acquisition_date: asset.acquisition_date,
            original_value: asset.original_value,
            method: Some(asset.method),
            duration_years: Some(asset.duration_years),
        }
    }
}

/// Accumulated depreciation and net book value of an asset on a date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub accumulated_depreciation: f64,
    pub net_book_value: f64,
    pub status: AssetStatus,
}

/// Optional criteria for [`AssetService::list_filtered`].
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub family_code: Option<String>,
    pub location_code: Option<String>,
    pub status: Option<AssetStatus>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        self.matches_placement(asset) && self.matches_status(asset.status)
    }

    /// Family and location criteria only.
    pub fn matches_placement(&self, asset: &Asset) -> bool {
        let family = self
            .family_code
            .as_deref()
            .map_or(true, |code| asset.family_code.eq_ignore_ascii_case(code.trim()));
        let location = self
            .location_code
            .as_deref()
            .map_or(true, |code| asset.location_code.eq_ignore_ascii_case(code.trim()));
        family && location
    }

    pub fn matches_status(&self, status: AssetStatus) -> bool {
        self.status.map_or(true, |wanted| wanted == status)
    }
}

/// Counts reported by [`AssetService::refresh_valuations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub fully_depreciated: usize,
}

pub struct AssetService;

impl AssetService {
    /// Adds an asset and values it as of `as_of`.
    pub fn add(
        register: &mut Register,
        draft: AssetDraft,
        as_of: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let mut asset = Self::build(register, draft, None)?;
        Self::apply_valuation(&mut asset, as_of)?;
        info!(code = %asset.code, value = asset.original_value, "asset added");
        Ok(register.add_asset(asset))
    }

    /// Replaces the asset identified by `code` with `draft` and revalues it.
    pub fn edit(
        register: &mut Register,
        code: &str,
        draft: AssetDraft,
        as_of: NaiveDate,
    ) -> Result<(), CoreError> {
        let current = register
            .asset(code)
            .map(|asset| asset.code.clone())
            .ok_or_else(|| CoreError::AssetNotFound(code.trim().to_string()))?;
        let mut updated = Self::build(register, draft, Some(&current))?;
        Self::apply_valuation(&mut updated, as_of)?;

        let asset = register
            .asset_mut(&current)
            .ok_or_else(|| CoreError::AssetNotFound(current.clone()))?;
        updated.id = asset.id;
        updated.created_at = asset.created_at;
        *asset = updated;
        asset.touch();
        register.touch();
        Ok(())
    }

    pub fn remove(register: &mut Register, code: &str) -> Result<Asset, CoreError> {
        let index = register
            .assets
            .iter()
            .position(|asset| asset.has_code(code))
            .ok_or_else(|| CoreError::AssetNotFound(code.trim().to_string()))?;
        let removed = register.assets.remove(index);
        register.touch();
        info!(code = %removed.code, "asset removed");
        Ok(removed)
    }

    pub fn list(register: &Register) -> Vec<&Asset> {
        Self::list_filtered(register, &AssetFilter::default())
    }

    pub fn list_filtered<'a>(register: &'a Register, filter: &AssetFilter) -> Vec<&'a Asset> {
        let mut assets: Vec<&Asset> = register
            .assets
            .iter()
            .filter(|asset| filter.matches(asset))
            .collect();
        assets.sort_by(|a, b| a.code.cmp(&b.code));
        assets
    }

    /// Depreciation schedule of the asset `code` as seen on `as_of`.
    pub fn schedule(
        register: &Register,
        code: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, CoreError> {
        let asset = register
            .asset(code)
            .ok_or_else(|| CoreError::AssetNotFound(code.trim().to_string()))?;
        let input = AssetInput::try_from(asset)?;
        Ok(generate_schedule(&input, as_of))
    }

    /// Values `asset` on `as_of` without touching the stored snapshot.
    pub fn valuation(asset: &Asset, as_of: NaiveDate) -> Result<Valuation, CoreError> {
        if !asset.method.is_depreciable() {
            return Ok(Valuation {
                accumulated_depreciation: 0.0,
                net_book_value: round_cents(asset.original_value),
                status: AssetStatus::InService,
            });
        }
        let input = AssetInput::try_from(asset)?;
        let schedule = generate_schedule(&input, as_of);
        let (accumulated, net) = schedule
            .last()
            .map(|entry| (entry.cumulative_depreciation, entry.net_book_value))
            .unwrap_or((0.0, round_cents(asset.original_value)));
        let status = if net <= 0.0 {
            AssetStatus::FullyDepreciated
        } else {
            AssetStatus::InService
        };
        Ok(Valuation {
            accumulated_depreciation: accumulated,
            net_book_value: net,
            status,
        })
    }

    /// Recomputes the stored snapshot of every asset as of `as_of`.
    pub fn refresh_valuations(
        register: &mut Register,
        as_of: NaiveDate,
    ) -> Result<RefreshSummary, CoreError> {
        let mut summary = RefreshSummary::default();
        for asset in register.assets.iter_mut() {
            Self::apply_valuation(asset, as_of)?;
            summary.refreshed += 1;
            if asset.is_fully_depreciated() {
                summary.fully_depreciated += 1;
            }
        }
        register.touch();
        info!(
            as_of = %as_of,
            refreshed = summary.refreshed,
            fully_depreciated = summary.fully_depreciated,
            "valuations refreshed"
        );
        Ok(summary)
    }

    fn apply_valuation(asset: &mut Asset, as_of: NaiveDate) -> Result<(), CoreError> {
        let valuation = Self::valuation(asset, as_of)?;
        debug!(code = %asset.code, net = valuation.net_book_value, "asset revalued");
        asset.accumulated_depreciation = valuation.accumulated_depreciation;
        asset.net_book_value = valuation.net_book_value;
        asset.status = valuation.status;
        Ok(())
    }

    fn build(
        register: &Register,
        draft: AssetDraft,
        current: Option<&str>,
    ) -> Result<Asset, CoreError> {
        let code = normalize_code("Asset", &draft.code)?;
        let label = normalize_label("Asset", &draft.label)?;
        ensure_unique("Asset", &register.assets, &code, current)?;
        ensure_amount("Original value", draft.original_value)?;

        let family = register
            .family(&draft.family_code)
            .ok_or_else(|| CoreError::FamilyNotFound(draft.family_code.trim().to_string()))?;
        let location = register
            .location(&draft.location_code)
            .ok_or_else(|| CoreError::LocationNotFound(draft.location_code.trim().to_string()))?;

        let method = draft.method.unwrap_or(family.method);
        let duration_years = draft.duration_years.unwrap_or(family.duration_years);
        if method.is_depreciable() && duration_years == 0 {
            return Err(CoreError::Validation(format!(
                "Asset `{code}` needs a duration of at least one year for method {}",
                method.storage_code()
            )));
        }

        Ok(Asset::new(
            code,
            label,
            family.code.clone(),
            location.code.clone(),
            draft.acquisition_date,
            draft.original_value,
            method,
            duration_years,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_domain::{Family, Location};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn register() -> Register {
        let mut register = Register::new("Assets");
        register.add_family(Family::new(
            "VEH",
            "VEHICULES",
            DepreciationMethod::StraightLine,
            4,
        ));
        register.add_family(Family::new("TER", "TERRAINS", DepreciationMethod::None, 0));
        register.add_location(Location::new("AP", "AGENCE PARIS"));
        register
    }

    fn draft(code: &str, family: &str) -> AssetDraft {
        AssetDraft {
            code: code.into(),
            label: "MATERIEL DE TRANSPORT".into(),
            family_code: family.into(),
            location_code: "ap".into(),
            acquisition_date: date(2021, 6, 10),
            original_value: 25_000.0,
            method: None,
            duration_years: None,
        }
    }

    #[test]
    fn add_takes_plan_from_family_and_canonical_codes() {
        let mut register = register();
        AssetService::add(&mut register, draft("218200", "veh"), date(2021, 6, 10)).unwrap();

        let asset = register.asset("218200").unwrap();
        assert_eq!(asset.method, DepreciationMethod::StraightLine);
        assert_eq!(asset.duration_years, 4);
        assert_eq!(asset.family_code, "VEH");
        assert_eq!(asset.location_code, "AP");
        assert_eq!(asset.net_book_value, 25_000.0);
    }

    #[test]
    fn add_rejects_unknown_references_and_bad_values() {
        let mut register = register();
        let today = date(2024, 1, 1);
        assert!(matches!(
            AssetService::add(&mut register, draft("X", "IT"), today),
            Err(CoreError::FamilyNotFound(_))
        ));

        let mut bad_location = draft("X", "VEH");
        bad_location.location_code = "U9".into();
        assert!(matches!(
            AssetService::add(&mut register, bad_location, today),
            Err(CoreError::LocationNotFound(_))
        ));

        let mut negative = draft("X", "VEH");
        negative.original_value = -10.0;
        assert!(matches!(
            AssetService::add(&mut register, negative, today),
            Err(CoreError::Validation(_))
        ));
        assert!(register.assets.is_empty());
    }

    #[test]
    fn schedule_of_non_depreciable_asset_is_rejected() {
        let mut register = register();
        AssetService::add(&mut register, draft("LAND", "TER"), date(2024, 1, 1)).unwrap();

        let err = AssetService::schedule(&register, "LAND", date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        let land = register.asset("LAND").unwrap();
        assert_eq!(land.net_book_value, 25_000.0);
        assert_eq!(land.status, AssetStatus::InService);
    }

    #[test]
    fn refresh_marks_fully_depreciated_assets() {
        let mut register = register();
        AssetService::add(&mut register, draft("218200", "VEH"), date(2021, 6, 10)).unwrap();
        AssetService::add(&mut register, draft("LAND", "TER"), date(2021, 6, 10)).unwrap();

        let summary = AssetService::refresh_valuations(&mut register, date(2022, 6, 10)).unwrap();
        assert_eq!(summary.refreshed, 2);
        assert_eq!(summary.fully_depreciated, 0);
        let vehicle = register.asset("218200").unwrap();
        assert_eq!(vehicle.accumulated_depreciation, 6_250.0);
        assert_eq!(vehicle.net_book_value, 18_750.0);

        let summary = AssetService::refresh_valuations(&mut register, date(2030, 1, 1)).unwrap();
        assert_eq!(summary.fully_depreciated, 1);
        assert!(register.asset("218200").unwrap().is_fully_depreciated());
        assert!(!register.asset("LAND").unwrap().is_fully_depreciated());
    }

    #[test]
    fn edit_keeps_identity_and_revalues() {
        let mut register = register();
        let id =
            AssetService::add(&mut register, draft("218200", "VEH"), date(2021, 6, 10)).unwrap();

        let mut changes = AssetDraft::from_asset(register.asset("218200").unwrap());
        changes.original_value = 20_000.0;
        changes.duration_years = Some(2);
        AssetService::edit(&mut register, "218200", changes, date(2030, 1, 1)).unwrap();

        let asset = register.asset("218200").unwrap();
        assert_eq!(asset.id, id);
        assert_eq!(asset.duration_years, 2);
        assert_eq!(asset.accumulated_depreciation, 20_000.0);
        assert_eq!(asset.status, AssetStatus::FullyDepreciated);
    }

    #[test]
    fn filter_by_family_and_status() {
        let mut register = register();
        AssetService::add(&mut register, draft("218200", "VEH"), date(2030, 1, 1)).unwrap();
        AssetService::add(&mut register, draft("LAND", "TER"), date(2030, 1, 1)).unwrap();

        let filter = AssetFilter {
            family_code: Some("veh".into()),
            ..AssetFilter::default()
        };
        let codes: Vec<&str> = AssetService::list_filtered(&register, &filter)
            .into_iter()
            .map(|asset| asset.code.as_str())
            .collect();
        assert_eq!(codes, vec!["218200"]);

        let filter = AssetFilter {
            status: Some(AssetStatus::FullyDepreciated),
            ..AssetFilter::default()
        };
        let depreciated = AssetService::list_filtered(&register, &filter);
        assert_eq!(depreciated.len(), 1);
        assert_eq!(depreciated[0].code, "218200");
    }
}
