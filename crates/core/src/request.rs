// crates/core/src/request.rs
//! Submission request and field-level validation.
//!
//! Validation runs before any job is created: all failures are collected
//! into one list so the UI can render every field error at once.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex_lite::Regex;
use serde::Deserialize;

/// Parameters for one report run, as posted by the UI.
#[derive(Debug, Clone, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub debug: bool,
}

/// Strict zero-padded MM/DD/YYYY (the portal's native date format).
fn slash_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12]\d|3[01])/(\d{4})$").expect("valid date regex")
    })
}

impl RunRequest {
    /// Validate all fields, collecting every error.
    ///
    /// Returns `Err` with one human-readable message per failed field;
    /// the date-range check only runs once both dates parse.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.username.trim().is_empty() {
            errors.push("Username is required.".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password is required.".to_string());
        }

        let start = parse_date(self.start_date.trim());
        if start.is_none() {
            errors.push(
                "Start date must be a valid date in MM/DD/YYYY or YYYY-MM-DD format.".to_string(),
            );
        }
        let end = parse_date(self.end_date.trim());
        if end.is_none() {
            errors.push(
                "End date must be a valid date in MM/DD/YYYY or YYYY-MM-DD format.".to_string(),
            );
        }

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                errors.push("Start date must be on or before end date.".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Parse a submitted date in either MM/DD/YYYY or ISO YYYY-MM-DD form.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if slash_date_pattern().is_match(raw) {
        return NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_request() -> RunRequest {
        RunRequest {
            username: "u".to_string(),
            password: "p".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: "2024-01-31".to_string(),
            debug: false,
        }
    }

    #[test]
    fn test_valid_request_iso_dates() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_valid_request_slash_dates() {
        let mut req = valid_request();
        req.start_date = "01/01/2024".to_string();
        req.end_date = "01/31/2024".to_string();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_username_and_password() {
        let mut req = valid_request();
        req.username = "   ".to_string();
        req.password = String::new();
        let errors = req.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Username is required.".to_string(),
                "Password is required.".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_dates() {
        let mut req = valid_request();
        req.start_date = "1/1/2024".to_string(); // not zero-padded, not ISO
        req.end_date = "2024-13-40".to_string(); // impossible date
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Start date"));
        assert!(errors[1].starts_with("End date"));
    }

    #[test]
    fn test_start_after_end() {
        let mut req = valid_request();
        req.start_date = "2024-02-01".to_string();
        req.end_date = "2024-01-01".to_string();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors, vec!["Start date must be on or before end date.".to_string()]);
    }

    #[test]
    fn test_range_check_skipped_when_date_invalid() {
        let mut req = valid_request();
        req.start_date = "garbage".to_string();
        let errors = req.validate().unwrap_err();
        // Only the format error; no spurious range error.
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_all_errors_collected() {
        let req = RunRequest {
            username: String::new(),
            password: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            debug: false,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_deserialize_defaults() {
        let req: RunRequest = serde_json::from_str(r#"{"username":"u"}"#).unwrap();
        assert_eq!(req.username, "u");
        assert!(req.password.is_empty());
        assert!(!req.debug);
    }
}
