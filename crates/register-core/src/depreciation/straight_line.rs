use crate::CoreError;

/// Equal annual amount over the useful life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLine {
    annual: f64,
}

impl StraightLine {
    pub fn new(original_value: f64, useful_life_years: u32) -> Result<Self, CoreError> {
        if useful_life_years == 0 {
            return Err(CoreError::InvalidInput(
                "straight-line depreciation needs a useful life of at least one year".into(),
            ));
        }
        Ok(Self::with_life(original_value, useful_life_years))
    }

    /// Caller guarantees `useful_life_years > 0`.
    pub(crate) fn with_life(original_value: f64, useful_life_years: u32) -> Self {
        Self {
            annual: original_value / useful_life_years as f64,
        }
    }

    /// Full-year (non-prorated) amount, identical for every year.
    pub fn annual_amount(&self) -> f64 {
        self.annual
    }
}
