//! Field checks shared by the register services.

use register_domain::Coded;

use crate::CoreError;

/// Trims `code` and rejects empty values.
pub(crate) fn normalize_code(kind: &str, code: &str) -> Result<String, CoreError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{kind} code cannot be empty")));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "{kind} code `{trimmed}` cannot contain spaces"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims `label`, rejecting empty values.
pub(crate) fn normalize_label(kind: &str, label: &str) -> Result<String, CoreError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{kind} label cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Fails when another record (other than `current`) already uses `candidate`.
pub(crate) fn ensure_unique<'a, T, I>(
    kind: &str,
    records: I,
    candidate: &str,
    current: Option<&str>,
) -> Result<(), CoreError>
where
    T: Coded + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let duplicate = records.into_iter().any(|record| {
        record.has_code(candidate) && current.map_or(true, |code| !record.has_code(code))
    });
    if duplicate {
        Err(CoreError::Validation(format!(
            "{kind} `{candidate}` already exists"
        )))
    } else {
        Ok(())
    }
}

pub(crate) fn ensure_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_domain::Location;

    #[test]
    fn codes_are_trimmed_and_required() {
        assert_eq!(normalize_code("Family", "  MOB ").unwrap(), "MOB");
        assert!(normalize_code("Family", "   ").is_err());
        assert!(normalize_code("Family", "MO B").is_err());
    }

    #[test]
    fn uniqueness_ignores_the_record_being_edited() {
        let locations = vec![Location::new("SS", "SIEGE"), Location::new("AP", "ANNEXE")];
        assert!(ensure_unique("Location", &locations, "ss", None).is_err());
        assert!(ensure_unique("Location", &locations, "ss", Some("SS")).is_ok());
        assert!(ensure_unique("Location", &locations, "ap", Some("SS")).is_err());
        assert!(ensure_unique("Location", &locations, "U1", None).is_ok());
    }

    #[test]
    fn amounts_must_be_finite_and_non_negative() {
        assert!(ensure_amount("value", 0.0).is_ok());
        assert!(ensure_amount("value", -0.01).is_err());
        assert!(ensure_amount("value", f64::INFINITY).is_err());
    }
}
