//! Soft field validation, applied on blur and as a gate before PDF
//! generation. Empty values always pass; requiredness is not checked here.

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::controls::{ControlSet, keys};

static TELEPHONE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s()-]+$").expect("compile telephone pattern"));
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r".+@.+").expect("compile email pattern"));
static SSN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{3}-\d{2}-\d{4}|\d{9}|[a-zA-Z0-9]{8})$").expect("compile ssn pattern")
});

struct Rule {
    control: &'static str,
    ok: fn(&str, Date) -> bool,
    message: &'static str,
}

/// Checked in page order; each rule owns the message shown next to its
/// control.
const RULES: &[Rule] = &[
    Rule {
        control: keys::Q3B_TELEPHONE,
        ok: |value, _| TELEPHONE_SHAPE.is_match(value),
        message: "Must only contain digits and separators.",
    },
    Rule {
        control: keys::Q3C_EMAIL,
        ok: |value, _| EMAIL_SHAPE.is_match(value),
        message: "Must be a valid email format.",
    },
    Rule {
        control: keys::Q3F_SSN,
        ok: |value, _| SSN_SHAPE.is_match(value),
        message: "Must be a 9-digit SSN or 8-character UPIN.",
    },
    Rule {
        control: keys::Q3G_DOB,
        ok: not_in_future,
        message: "Date of Birth cannot be in the future.",
    },
];

/// A date of birth must parse and must not lie after today. An unreadable
/// non-empty value counts as invalid rather than slipping through.
fn not_in_future(value: &str, today: Date) -> bool {
    let Ok(date) = Date::parse(
        value,
        time::macros::format_description!("[year]-[month]-[day]"),
    ) else {
        return false;
    };
    date <= today
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationFailure {
    pub control: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub valid: bool,
    pub failures: Vec<ValidationFailure>,
}

/// Checks one control, returning the failure message when its current value
/// breaks the control's rule. Disabled controls are still checked; values
/// they hold stay visible on the page.
pub fn check_control(set: &ControlSet, key: &str, today: Date) -> Option<&'static str> {
    let rule = RULES.iter().find(|rule| rule.control == key)?;
    let value = set.raw_value(key)?;
    if value.is_empty() {
        return None;
    }
    if (rule.ok)(value, today) {
        None
    } else {
        Some(rule.message)
    }
}

/// Runs every rule against the live controls, in page order.
pub fn validate_controls(set: &ControlSet, today: Date) -> ValidationReport {
    let failures: Vec<ValidationFailure> = RULES
        .iter()
        .filter_map(|rule| {
            check_control(set, rule.control, today).map(|message| ValidationFailure {
                control: rule.control.to_string(),
                message: message.to_string(),
            })
        })
        .collect();
    ValidationReport {
        valid: failures.is_empty(),
        failures,
    }
}
