//! Prompt helpers shared by the menu screens.
//!
//! Esc backs out of the current screen; Ctrl-C (or a broken terminal) leaves the app.

use crate::domain::aggregation::MAX_REPORT_DAYS;
use crate::domain::validation::{self, DATE_FORMAT};
use chrono::NaiveDate;
use crossterm::style::Stylize;
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, InquireError, Select, Text};
use std::fmt;
use tracing::warn;

/// Why a screen stopped before finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    /// Esc: return to the enclosing menu.
    Back,
    /// Ctrl-C or terminal failure: exit the app.
    Quit,
}

pub type Step<T> = Result<T, Nav>;

pub fn ask<T>(result: Result<T, InquireError>) -> Step<T> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled) => Err(Nav::Back),
        Err(InquireError::OperationInterrupted) => Err(Nav::Quit),
        Err(e) => {
            warn!(error = %e, "prompt failed");
            Err(Nav::Quit)
        }
    }
}

/// Select option carrying a value behind its label.
#[derive(Debug, Clone)]
pub struct Choice<T> {
    pub label: String,
    pub value: T,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl<T> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

pub fn menu(title: &str, options: &[&'static str]) -> Step<&'static str> {
    ask(Select::new(title, options.to_vec()).prompt())
}

pub fn choose<T>(title: &str, choices: Vec<Choice<T>>) -> Step<T> {
    let picked = ask(Select::new(title, choices).with_page_size(12).prompt())?;
    Ok(picked.value)
}

/// Non-empty text.
pub fn required(message: &str) -> Step<String> {
    ask(Text::new(message)
        .with_validator(|s: &str| {
            Ok(if s.trim().is_empty() {
                Validation::Invalid("This field is required".into())
            } else {
                Validation::Valid
            })
        })
        .prompt())
}

/// Empty input means no value.
pub fn optional(message: &str) -> Step<Option<String>> {
    let text = ask(Text::new(message)
        .with_help_message("Leave empty to skip")
        .prompt())?;
    Ok(validation::optional_text(Some(text)))
}

/// Text pre-filled with the current value. Returns `None` when left unchanged.
pub fn edit_text(message: &str, current: &str) -> Step<Option<String>> {
    let text = ask(Text::new(message).with_initial_value(current).prompt())?;
    Ok((text.trim() != current).then(|| text.trim().to_string()))
}

/// Edit an optional column. `Some(None)` clears it; `None` keeps it.
pub fn edit_optional(message: &str, current: Option<&str>) -> Step<Option<Option<String>>> {
    let text = ask(Text::new(message)
        .with_initial_value(current.unwrap_or_default())
        .with_help_message("Clear the text to remove the value")
        .prompt())?;
    let next = validation::optional_text(Some(text));
    Ok((next.as_deref() != current).then_some(next))
}

pub fn amount(message: &str, default: f64) -> Step<f64> {
    ask(CustomType::<f64>::new(message)
        .with_default(default)
        .with_error_message("Enter a number such as 42.5")
        .prompt())
}

fn days_validator(days: u32) -> Validation {
    if days <= MAX_REPORT_DAYS {
        Validation::Valid
    } else {
        Validation::Invalid(format!("At most {} days", MAX_REPORT_DAYS).into())
    }
}

pub fn whole_days(message: &str, default: u32) -> Step<u32> {
    ask(CustomType::<u32>::new(message)
        .with_default(default)
        .with_error_message("Enter a whole number of days")
        .with_validator(|days: &u32| Ok(days_validator(*days)))
        .prompt())
}

pub fn confirm(message: &str) -> Step<bool> {
    ask(Confirm::new(message).with_default(false).prompt())
}

fn date_validator(input: &str, allow_empty: bool) -> Validation {
    let trimmed = input.trim();
    if (allow_empty && trimmed.is_empty()) || validation::parse_date(trimmed).is_ok() {
        Validation::Valid
    } else {
        Validation::Invalid("Use the YYYY-MM-DD format, e.g. 2024-03-15".into())
    }
}

pub fn date(message: &str, default: NaiveDate) -> Step<NaiveDate> {
    let default = default.format(DATE_FORMAT).to_string();
    let text = ask(Text::new(message)
        .with_initial_value(&default)
        .with_validator(|s: &str| Ok(date_validator(s, false)))
        .prompt())?;
    validation::parse_date(text.trim()).map_err(|_| Nav::Back)
}

/// Empty input means no date.
pub fn optional_date(message: &str, current: Option<NaiveDate>) -> Step<Option<NaiveDate>> {
    let initial = current
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default();
    let text = ask(Text::new(message)
        .with_initial_value(&initial)
        .with_help_message("YYYY-MM-DD, leave empty for none")
        .with_validator(|s: &str| Ok(date_validator(s, true)))
        .prompt())?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        validation::parse_date(trimmed).map(Some).map_err(|_| Nav::Back)
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

pub fn failure(message: &str) {
    println!("{} {}", "❌".red(), message.red());
}

pub fn heading(title: &str) {
    println!("\n{}", title.bold().cyan());
}

pub fn note(message: &str) {
    println!("{}", message.dark_grey());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_validator() {
        assert_eq!(date_validator("2024-03-15", false), Validation::Valid);
        assert_eq!(date_validator(" ", true), Validation::Valid);
        assert!(matches!(date_validator("", false), Validation::Invalid(_)));
        assert!(matches!(date_validator("15/03/2024", true), Validation::Invalid(_)));
    }

    #[test]
    fn test_days_validator_caps_window() {
        assert_eq!(days_validator(30), Validation::Valid);
        assert_eq!(days_validator(MAX_REPORT_DAYS), Validation::Valid);
        assert!(matches!(days_validator(MAX_REPORT_DAYS + 1), Validation::Invalid(_)));
    }

    #[test]
    fn test_ask_maps_cancel_and_interrupt() {
        assert_eq!(ask::<()>(Err(InquireError::OperationCanceled)), Err(Nav::Back));
        assert_eq!(ask::<()>(Err(InquireError::OperationInterrupted)), Err(Nav::Quit));
        assert_eq!(ask(Ok(3)), Ok(3));
    }

    #[test]
    fn test_choice_displays_label() {
        assert_eq!(Choice::new("Acme (ID 1)", 1).to_string(), "Acme (ID 1)");
    }
}
