use crate::CoreError;

/// Minimum declining rate, used instead of a jurisdiction multiplier table.
pub const DECLINING_FLOOR_RATE: f64 = 0.35;

/// Declining balance with a switch to straight-line on the remainder.
///
/// Stateless: the caller owns the remaining value and passes it on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecliningBalance {
    useful_life_years: u32,
    rate: f64,
}

impl DecliningBalance {
    pub fn new(useful_life_years: u32) -> Result<Self, CoreError> {
        if useful_life_years == 0 {
            return Err(CoreError::InvalidInput(
                "declining-balance depreciation needs a useful life of at least one year".into(),
            ));
        }
        Ok(Self::with_life(useful_life_years))
    }

    /// Caller guarantees `useful_life_years > 0`.
    pub(crate) fn with_life(useful_life_years: u32) -> Self {
        let rate = (1.0 / useful_life_years as f64).max(DECLINING_FLOOR_RATE);
        Self {
            useful_life_years,
            rate,
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Nominal amount for the 1-based `year_index`, given the value remaining
    /// at the start of that year.
    pub fn amount(&self, year_index: u32, remaining_value: f64) -> f64 {
        let declining = remaining_value * self.rate;
        let years_left = self
            .useful_life_years
            .saturating_sub(year_index)
            .saturating_add(1);
        let straight = remaining_value / years_left as f64;
        declining.max(straight)
    }
}
