//! Browser boundary: string-in/string-out functions over the questionnaire
//! model, so the page can stay a thin DOM layer. Every function returns a
//! JSON string; failures come back as `{"error": ...}` instead of throwing.

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use wasm_bindgen::prelude::*;

use rpq_form::{ControlSet, decode_fragment, encode, validate_controls};
use rpq_pdf::map_record;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn parse_today(raw: &str) -> Result<Date, String> {
    Date::parse(raw, ISO_DATE).map_err(|error| format!("invalid date '{raw}': {error}"))
}

fn parse_controls(controls_json: &str) -> Result<ControlSet, String> {
    serde_json::from_str(controls_json).map_err(|error| format!("invalid controls JSON: {error}"))
}

fn render_controls(controls: &ControlSet) -> String {
    match serde_json::to_string(controls) {
        Ok(json) => json,
        Err(error) => error_json(&format!("serialization error: {error}")),
    }
}

/// Fresh questionnaire state for the first render, with the certification
/// date defaulted to `today` (`YYYY-MM-DD`).
#[wasm_bindgen]
pub fn blank_controls(today: &str) -> String {
    let today = match parse_today(today) {
        Ok(date) => date,
        Err(message) => return error_json(&message),
    };
    let mut controls = ControlSet::questionnaire();
    controls.apply_defaults(today);
    render_controls(&controls)
}

/// Rebuilds the page state from a location fragment. Unreadable fragments
/// fall back to a blank questionnaire rather than erroring, so a mangled
/// link still opens the form.
#[wasm_bindgen]
pub fn restore_controls(fragment: &str, today: &str) -> String {
    let today = match parse_today(today) {
        Ok(date) => date,
        Err(message) => return error_json(&message),
    };
    let record = decode_fragment(Some(fragment));
    let mut controls = ControlSet::questionnaire();
    controls.restore_record(&record);
    controls.apply_defaults(today);
    render_controls(&controls)
}

/// Captures the posted control state into a shareable token. Returns
/// `{"token": null}` when nothing has been answered.
#[wasm_bindgen]
pub fn capture_token(controls_json: &str, today: &str) -> String {
    let today = match parse_today(today) {
        Ok(date) => date,
        Err(message) => return error_json(&message),
    };
    let controls = match parse_controls(controls_json) {
        Ok(controls) => controls,
        Err(message) => return error_json(&message),
    };
    let record = controls.capture_record(today);
    match encode(&record) {
        Ok(token) => serde_json::json!({ "token": token }).to_string(),
        Err(error) => error_json(&format!("encode error: {error}")),
    }
}

/// Runs the field rules against the posted control state and returns the
/// validation report.
#[wasm_bindgen]
pub fn validate_page(controls_json: &str, today: &str) -> String {
    let today = match parse_today(today) {
        Ok(date) => date,
        Err(message) => return error_json(&message),
    };
    let controls = match parse_controls(controls_json) {
        Ok(controls) => controls,
        Err(message) => return error_json(&message),
    };
    let report = validate_controls(&controls, today);
    match serde_json::to_string(&report) {
        Ok(json) => json,
        Err(error) => error_json(&format!("serialization error: {error}")),
    }
}

/// Captures the posted control state and returns the ordered PDF field
/// operations for it, ready for the host's document layer.
#[wasm_bindgen]
pub fn plan_fields(controls_json: &str, today: &str) -> String {
    let today = match parse_today(today) {
        Ok(date) => date,
        Err(message) => return error_json(&message),
    };
    let controls = match parse_controls(controls_json) {
        Ok(controls) => controls,
        Err(message) => return error_json(&message),
    };
    let record = controls.capture_record(today);
    let mapping = map_record(&record, today);
    match serde_json::to_string(&mapping) {
        Ok(json) => json,
        Err(error) => error_json(&format!("serialization error: {error}")),
    }
}
