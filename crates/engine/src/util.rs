//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every write path enforces the same invariants before a
//! request reaches the backend.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, Money, ResultEngine};

const MAX_NAME_CHARS: usize = 50;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Trim a required display name to its NFKC form and reject empty or
/// oversized values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let name = category_key(value);
    if name.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(EngineError::InvalidName(format!(
            "{label} name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name)
}

/// Comparison key for names that must be unique per user.
///
/// NFKC folds compatibility forms (full-width letters, ligatures) so that
/// visually identical names collide. Case is kept: the backend's unique
/// constraint and the per-category totals both compare exact names.
pub(crate) fn category_key(name: &str) -> String {
    name.trim().nfkc().collect::<String>().trim().to_string()
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn normalize_description(value: Option<&str>) -> ResultEngine<Option<String>> {
    let description = normalize_optional_text(value);
    if let Some(text) = &description
        && text.chars().count() > MAX_DESCRIPTION_CHARS
    {
        return Err(EngineError::InvalidName(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(description)
}

/// Accept `#rrggbb` (case-insensitive) and return it lowercased.
pub(crate) fn normalize_color(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let valid = trimmed.len() == 7
        && trimmed.starts_with('#')
        && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(EngineError::InvalidColor(format!(
            "expected #rrggbb, got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Budgets are non-negative; zero means unlimited and is stored as absent.
pub(crate) fn normalize_budget(value: Option<Money>) -> ResultEngine<Option<Money>> {
    match value {
        Some(limit) if limit.is_negative() => Err(EngineError::InvalidAmount(
            "budget must not be negative".to_string(),
        )),
        Some(limit) if limit.is_zero() => Ok(None),
        Some(limit) if limit > Money::MAX_AMOUNT => Err(EngineError::InvalidAmount(
            "budget is too large".to_string(),
        )),
        other => Ok(other),
    }
}

pub(crate) fn ensure_non_negative(amount: Money) -> ResultEngine<Money> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(
            "amount must not be negative".to_string(),
        ));
    }
    if amount > Money::MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be at most {}",
            Money::MAX_AMOUNT.to_plain_string()
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_key_folds_width_but_keeps_case() {
        assert_eq!(category_key("  Food "), "Food");
        assert_eq!(category_key("Ｆｏｏｄ"), "Food");
        assert_ne!(category_key("food"), category_key("Food"));
        assert_eq!(normalize_required_name(" Ｆｏｏｄ ", "category").unwrap(), "Food");
    }

    #[test]
    fn colors_must_be_hex_triplets() {
        assert_eq!(normalize_color("#3B82F6").unwrap(), "#3b82f6");
        assert!(normalize_color("3b82f6").is_err());
        assert!(normalize_color("#3b82f").is_err());
        assert!(normalize_color("#zzzzzz").is_err());
    }

    #[test]
    fn zero_budget_means_unlimited() {
        assert_eq!(normalize_budget(Some(Money::ZERO)).unwrap(), None);
        assert_eq!(
            normalize_budget(Some(Money::from_major(500))).unwrap(),
            Some(Money::from_major(500))
        );
        assert!(normalize_budget(Some(Money::new(-1))).is_err());
        assert!(normalize_budget(Some(Money::MAX_AMOUNT + Money::new(1))).is_err());
    }

    #[test]
    fn amounts_are_capped() {
        assert_eq!(ensure_non_negative(Money::MAX_AMOUNT), Ok(Money::MAX_AMOUNT));
        assert!(matches!(
            ensure_non_negative(Money::from_major(900_000_000_000_000)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(ensure_non_negative(Money::new(-1)).is_err());
    }

    #[test]
    fn blank_text_is_absent() {
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(
            normalize_optional_text(Some(" lunch ")).as_deref(),
            Some("lunch")
        );
        assert!(normalize_required_name(" ", "category").is_err());
    }
}
