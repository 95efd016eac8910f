use crate::utils::error::{AdvisorError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number<T>(field_name: &str, value: T, min_value: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min_value {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AdvisorError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 檢查 id 是否重複，回傳第一個重複的 id
pub fn find_duplicate<'a, I>(ids: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("tiers.daily_capacity", 5u32, 1).is_ok());
        assert!(validate_positive_number("tiers.daily_capacity", 0u32, 1).is_err());
        assert!(validate_positive_number("manager.hourly_rate", 0.0f64, 0.0).is_ok());
        assert!(validate_positive_number("manager.hourly_rate", -1.0f64, 0.0).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output", "./sweep.csv").is_ok());
        assert!(validate_path("output", "").is_err());
        assert!(validate_path("output", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let some_value = Some("mini".to_string());
        let none_value: Option<String> = None;

        assert!(validate_required_field("tiers.id", &some_value).is_ok());
        assert!(validate_required_field("tiers.id", &none_value).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("catalog.name", "Trivya").is_ok());
        assert!(validate_non_empty_string("catalog.name", "").is_err());
        assert!(validate_non_empty_string("catalog.name", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("volume", 200, 50, 1000).is_ok());
        assert!(validate_range("volume", 49, 50, 1000).is_err());
        assert!(validate_range("volume", 1001, 50, 1000).is_err());
    }

    #[test]
    fn test_find_duplicate() {
        assert_eq!(find_duplicate(["mini", "trivya", "mini"]), Some("mini"));
        assert_eq!(find_duplicate(["mini", "trivya"]), None);
    }
}
