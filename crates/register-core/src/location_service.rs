use register_domain::{Location, Register};
use uuid::Uuid;

use crate::{
    validation::{ensure_unique, normalize_code, normalize_label},
    CoreError,
};

/// Provides validated operations for [`Location`] records.
pub struct LocationService;

impl LocationService {
    pub fn add(register: &mut Register, mut location: Location) -> Result<Uuid, CoreError> {
        location.code = normalize_code("Location", &location.code)?;
        location.label = normalize_label("Location", &location.label)?;
        ensure_unique("Location", &register.locations, &location.code, None)?;
        Ok(register.add_location(location))
    }

    /// Updates code and label; a new code is propagated to the assets kept there.
    pub fn edit(register: &mut Register, code: &str, changes: Location) -> Result<(), CoreError> {
        let current = register
            .location(code)
            .map(|location| location.code.clone())
            .ok_or_else(|| CoreError::LocationNotFound(code.trim().to_string()))?;
        let new_code = normalize_code("Location", &changes.code)?;
        let label = normalize_label("Location", &changes.label)?;
        ensure_unique("Location", &register.locations, &new_code, Some(&current))?;

        if let Some(location) = register.location_mut(&current) {
            location.code = new_code.clone();
            location.label = label;
        }
        if new_code != current {
            for asset in register
                .assets
                .iter_mut()
                .filter(|asset| asset.location_code.eq_ignore_ascii_case(&current))
            {
                asset.location_code = new_code.clone();
                asset.touch();
            }
        }
        register.touch();
        Ok(())
    }

    pub fn remove(register: &mut Register, code: &str) -> Result<(), CoreError> {
        let code = code.trim();
        if register.location(code).is_none() {
            return Err(CoreError::LocationNotFound(code.to_string()));
        }
        let in_use = register
            .assets
            .iter()
            .filter(|asset| asset.location_code.eq_ignore_ascii_case(code))
            .count();
        if in_use > 0 {
            return Err(CoreError::InvalidOperation(format!(
                "Location `{code}` still holds {in_use} asset(s)"
            )));
        }
        register
            .locations
            .retain(|location| !location.code.eq_ignore_ascii_case(code));
        register.touch();
        Ok(())
    }

    pub fn list(register: &Register) -> Vec<&Location> {
        let mut locations: Vec<&Location> = register.locations.iter().collect();
        locations.sort_by(|a, b| a.code.cmp(&b.code));
        locations
    }
}
