//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They run before any
//! backend call so rejected input never reaches the backend.

use api_types::{MoneyCents, YearMonth};

use crate::{EngineError, ResultEngine};

/// Trim a required name and reject blank values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Reject negative amounts for limits, targets and balances.
pub(crate) fn ensure_non_negative(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be >= 0, got {amount}"
        )));
    }
    Ok(())
}

/// Reject months outside `1..=12`.
pub(crate) fn validate_period(month: u32, year: i32) -> ResultEngine<YearMonth> {
    Ok(YearMonth::new(year, month)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(
            normalize_required_name("   ", "category"),
            Err(EngineError::InvalidName(_))
        ));
        assert_eq!(normalize_required_name(" Pets ", "category").unwrap(), "Pets");
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(ensure_non_negative(MoneyCents::new(-1), "limit").is_err());
        assert!(ensure_non_negative(MoneyCents::ZERO, "limit").is_ok());
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        assert!(matches!(
            validate_period(13, 2024),
            Err(EngineError::Parse(_))
        ));
        assert!(validate_period(12, 2024).is_ok());
    }
}
