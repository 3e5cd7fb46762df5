use chrono::NaiveDate;
use register_domain::shift_years;

/// Fraction of the fiscal year starting at `start` that has elapsed by `now`.
///
/// The year runs from `start` to the same day one calendar year later, so its
/// length is 365 or 366 days. The result is clamped to `[0, 1]`.
pub fn prorate(start: NaiveDate, now: NaiveDate) -> f64 {
    let end = shift_years(start, 1);
    let days_in_year = (end - start).num_days();
    if days_in_year <= 0 {
        return 1.0;
    }
    let days_elapsed = (now - start).num_days();
    (days_elapsed as f64 / days_in_year as f64).clamp(0.0, 1.0)
}
