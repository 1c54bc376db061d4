use crate::utils::error::{Result, SantaError};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SantaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 只做基本檢查：一個 '@'，兩側非空，網域含 '.'
pub fn validate_email(field_name: &str, email: &str) -> Result<()> {
    let invalid = |reason: &str| SantaError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: email.to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("Email address cannot contain whitespace"));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.contains('@') => {
            if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
                Err(invalid("Email domain must look like 'example.com'"))
            } else {
                Ok(())
            }
        }
        _ => Err(invalid("Email address must have the form 'name@domain'")),
    }
}

/// Returns the first value that occurs more than once.
pub fn validate_unique<'a, I>(field_name: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(SantaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: value.to_string(),
                reason: "Value must be unique".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SantaError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("transport.endpoint", "https://example.com").is_ok());
        assert!(validate_url("transport.endpoint", "http://example.com").is_ok());
        assert!(validate_url("transport.endpoint", "").is_err());
        assert!(validate_url("transport.endpoint", "invalid-url").is_err());
        assert!(validate_url("transport.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("solver.max_nodes", 5, 1).is_ok());
        assert!(validate_positive_number("solver.max_nodes", 0, 1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "alice@example.com").is_ok());
        assert!(validate_email("email", "a.b+c@mail.example.org").is_ok());
        assert!(validate_email("email", "alice").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "alice@localhost").is_err());
        assert!(validate_email("email", "alice@@example.com").is_err());
        assert!(validate_email("email", "alice @example.com").is_err());
    }

    #[test]
    fn test_validate_unique() {
        assert!(validate_unique("emails", ["a", "b", "c"]).is_ok());
        let err = validate_unique("emails", ["a", "b", "a"]).unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("x".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("from", &present).unwrap(), "x");
        assert!(matches!(
            validate_required_field("from", &missing),
            Err(SantaError::MissingConfigError { .. })
        ));
    }
}
