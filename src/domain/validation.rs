//! Input validation and normalisation. Runs before anything touches the store.
//!
//! Every `normalize_*` function returns a cleaned copy: trimmed text, empty optional
//! fields collapsed to `None`, emails lowercased.

use crate::domain::{
    ClientUpdate, DomainError, NewCategory, NewClient, NewProject, NewTimeEntry, ProjectUpdate,
    TimeEntryUpdate,
};
use chrono::NaiveDate;

/// Upper bound for a single work session.
pub const MAX_HOURS_PER_ENTRY: f64 = 24.0;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn required_text(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `local@domain.tld`. Returns the trimmed, lowercased address.
pub fn email(value: &str) -> Result<String, DomainError> {
    let email = value.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation(format!(
            "'{}' is not a valid email address",
            value.trim()
        )));
    }
    Ok(email)
}

pub fn hourly_rate(rate: f64) -> Result<f64, DomainError> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(DomainError::validation(format!(
            "hourly rate must be a positive amount, got {}",
            rate
        )));
    }
    Ok(rate)
}

pub fn hours_worked(hours: f64) -> Result<f64, DomainError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(DomainError::validation(format!(
            "hours worked must be positive, got {}",
            hours
        )));
    }
    if hours > MAX_HOURS_PER_ENTRY {
        return Err(DomainError::validation(format!(
            "hours worked cannot exceed {} per entry, got {}",
            MAX_HOURS_PER_ENTRY, hours
        )));
    }
    Ok(hours)
}

/// `#RRGGBB`, case-insensitive. Stored uppercased.
pub fn color_code(value: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(code) = optional_text(value) else {
        return Ok(None);
    };
    let hex = code.strip_prefix('#').unwrap_or("");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DomainError::validation(format!(
            "color code '{}' must look like #FF5733",
            code
        )));
    }
    Ok(Some(code.to_uppercase()))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::validation(format!("'{}' is not a date (expected YYYY-MM-DD)", value.trim()))
    })
}

pub fn normalize_new_client(input: NewClient) -> Result<NewClient, DomainError> {
    Ok(NewClient {
        name: required_text("client name", &input.name)?,
        email: email(&input.email)?,
        company: optional_text(input.company),
        phone: optional_text(input.phone),
        notes: optional_text(input.notes),
    })
}

pub fn normalize_client_update(update: ClientUpdate) -> Result<ClientUpdate, DomainError> {
    Ok(ClientUpdate {
        name: update
            .name
            .map(|n| required_text("client name", &n))
            .transpose()?,
        email: update.email.map(|e| email(&e)).transpose()?,
        company: update.company.map(optional_text),
        phone: update.phone.map(optional_text),
        notes: update.notes.map(optional_text),
    })
}

pub fn normalize_new_project(input: NewProject) -> Result<NewProject, DomainError> {
    Ok(NewProject {
        name: required_text("project name", &input.name)?,
        hourly_rate: hourly_rate(input.hourly_rate)?,
        description: optional_text(input.description),
        ..input
    })
}

pub fn normalize_project_update(update: ProjectUpdate) -> Result<ProjectUpdate, DomainError> {
    Ok(ProjectUpdate {
        name: update
            .name
            .map(|n| required_text("project name", &n))
            .transpose()?,
        description: update.description.map(optional_text),
        hourly_rate: update.hourly_rate.map(hourly_rate).transpose()?,
        ..update
    })
}

pub fn normalize_new_time_entry(input: NewTimeEntry) -> Result<NewTimeEntry, DomainError> {
    Ok(NewTimeEntry {
        hours_worked: hours_worked(input.hours_worked)?,
        description: required_text("description", &input.description)?,
        task_type: optional_text(input.task_type).map(|t| t.to_lowercase()),
        ..input
    })
}

pub fn normalize_time_entry_update(
    update: TimeEntryUpdate,
) -> Result<TimeEntryUpdate, DomainError> {
    Ok(TimeEntryUpdate {
        date: update.date,
        hours_worked: update.hours_worked.map(hours_worked).transpose()?,
        description: update
            .description
            .map(|d| required_text("description", &d))
            .transpose()?,
        task_type: update
            .task_type
            .map(|t| optional_text(t).map(|t| t.to_lowercase())),
    })
}

pub fn normalize_new_category(input: NewCategory) -> Result<NewCategory, DomainError> {
    Ok(NewCategory {
        name: required_text("category name", &input.name)?,
        description: optional_text(input.description),
        color_code: color_code(input.color_code)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalised() {
        assert_eq!(email("  A@A.com ").unwrap(), "a@a.com");
        assert!(email("no-at-sign.com").is_err());
        assert!(email("a@localhost").is_err());
        assert!(email("@a.com").is_err());
        assert!(email("a@b@c.com").is_err());
    }

    #[test]
    fn test_hours_bounds() {
        assert!(hours_worked(2.5).is_ok());
        assert!(hours_worked(0.0).is_err());
        assert!(hours_worked(-1.0).is_err());
        assert!(hours_worked(f64::NAN).is_err());
        assert!(hours_worked(24.5).is_err());
    }

    #[test]
    fn test_rate_must_be_positive() {
        assert!(hourly_rate(50.0).is_ok());
        assert!(hourly_rate(0.0).is_err());
        assert!(hourly_rate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_color_code() {
        assert_eq!(
            color_code(Some("#ff5733".into())).unwrap(),
            Some("#FF5733".to_string())
        );
        assert_eq!(color_code(Some("   ".into())).unwrap(), None);
        assert!(color_code(Some("red".into())).is_err());
        assert!(color_code(Some("#12345".into())).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(matches!(parse_date("2023-02-29"), Err(DomainError::Validation(_))));
        assert!(parse_date("29/02/2024").is_err());
    }

    #[test]
    fn test_new_client_optional_fields_collapse() {
        let client = normalize_new_client(NewClient {
            name: " Acme ".into(),
            email: "Sales@Acme.io".into(),
            company: Some("".into()),
            phone: Some(" 555-0100 ".into()),
            notes: None,
        })
        .unwrap();
        assert_eq!(client.name, "Acme");
        assert_eq!(client.email, "sales@acme.io");
        assert_eq!(client.company, None);
        assert_eq!(client.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_client_update_blank_clears() {
        let update = normalize_client_update(ClientUpdate {
            company: Some(Some("  ".into())),
            ..ClientUpdate::default()
        })
        .unwrap();
        assert_eq!(update.company, Some(None));
        assert!(normalize_client_update(ClientUpdate {
            name: Some(" ".into()),
            ..ClientUpdate::default()
        })
        .is_err());
    }
}
