//! Business logic helpers for asset family management.

use register_domain::{DepreciationMethod, Family, Register};
use uuid::Uuid;

use crate::{
    validation::{ensure_unique, normalize_code, normalize_label},
    CoreError,
};

/// Provides validated operations for [`Family`] records.
pub struct FamilyService;

impl FamilyService {
    /// Adds a family after checking its code, label and default plan.
    pub fn add(register: &mut Register, mut family: Family) -> Result<Uuid, CoreError> {
        family.code = normalize_code("Family", &family.code)?;
        family.label = normalize_label("Family", &family.label)?;
        ensure_unique("Family", &register.families, &family.code, None)?;
        Self::validate_plan(family.method, family.duration_years)?;
        Ok(register.add_family(family))
    }

    /// Replaces the editable fields of the family identified by `code`.
    ///
    /// Renaming the code rewrites the family reference of every asset.
    pub fn edit(register: &mut Register, code: &str, changes: Family) -> Result<(), CoreError> {
        let current = register
            .family(code)
            .map(|family| family.code.clone())
            .ok_or_else(|| CoreError::FamilyNotFound(code.trim().to_string()))?;
        let new_code = normalize_code("Family", &changes.code)?;
        let label = normalize_label("Family", &changes.label)?;
        ensure_unique("Family", &register.families, &new_code, Some(&current))?;
        Self::validate_plan(changes.method, changes.duration_years)?;

        if let Some(family) = register.family_mut(&current) {
            family.code = new_code.clone();
            family.label = label;
            family.method = changes.method;
            family.duration_years = changes.duration_years;
            family.duration_months = changes.duration_months;
        }
        if new_code != current {
            for asset in register
                .assets
                .iter_mut()
                .filter(|asset| asset.family_code.eq_ignore_ascii_case(&current))
            {
                asset.family_code = new_code.clone();
                asset.touch();
            }
        }
        register.touch();
        Ok(())
    }

    /// Removes a family no asset refers to.
    pub fn remove(register: &mut Register, code: &str) -> Result<(), CoreError> {
        if register.family(code).is_none() {
            return Err(CoreError::FamilyNotFound(code.trim().to_string()));
        }
        if let Some(asset) = register
            .assets
            .iter()
            .find(|asset| asset.family_code.eq_ignore_ascii_case(code.trim()))
        {
            return Err(CoreError::InvalidOperation(format!(
                "Family `{}` is used by asset `{}`",
                code.trim(),
                asset.code
            )));
        }
        register
            .families
            .retain(|family| !family.code.eq_ignore_ascii_case(code.trim()));
        register.touch();
        Ok(())
    }

    /// Families sorted by code.
    pub fn list(register: &Register) -> Vec<&Family> {
        let mut families: Vec<&Family> = register.families.iter().collect();
        families.sort_by(|a, b| a.code.cmp(&b.code));
        families
    }

    fn validate_plan(method: DepreciationMethod, duration_years: u32) -> Result<(), CoreError> {
        if method.is_depreciable() && duration_years == 0 {
            return Err(CoreError::Validation(
                "Depreciable families need a duration of at least one year".into(),
            ));
        }
        Ok(())
    }
}
