use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::answers::{AnswerRecord, TriState};
use crate::choices::{
    self, COUNTRY_TOKENS, ETHNICITY_TOKENS, EXCEPTION_TOKENS, FIREARM_TYPE_TOKENS,
    FORM_TYPE_TOKENS, RACE_TOKENS, YES_NO_TOKENS, parse_token, token_of,
};
use crate::deps;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Control names as they appear on the page (and, unchanged, as the keys of
/// the persisted record).
pub mod keys {
    pub const Q1_FORM_TYPE: &str = "q1_formType";
    pub const Q2_FULL_NAME: &str = "q2_fullName";
    pub const Q2_ADDRESS: &str = "q2_address";
    pub const Q3A_FULL_NAME: &str = "q3a_fullName";
    pub const Q3A_HOME_ADDRESS: &str = "q3a_homeAddress";
    pub const Q3A_SAME_AS_2: &str = "q3a_sameAs2";
    pub const Q3B_TELEPHONE: &str = "q3b_telephone";
    pub const Q3C_EMAIL: &str = "q3c_email";
    pub const Q3D_OTHER_NAMES: &str = "q3d_otherNames";
    pub const Q3F_SSN: &str = "q3f_ssn";
    pub const Q3G_DOB: &str = "q3g_dob";
    pub const Q3H_ETHNICITY: &str = "q3h_ethnicity";
    pub const Q3I_RACE: &str = "q3i_race";
    pub const Q4A_FIREARM_TYPE: &str = "q4a_firearmType";
    pub const Q4A_FIREARM_TYPE_OTHER: &str = "q4a_firearmType_other";
    pub const Q4B_NAME: &str = "q4b_name";
    pub const Q4B_ADDRESS: &str = "q4b_address";
    pub const Q4C_MODEL: &str = "q4c_model";
    pub const Q4D_CALIBER: &str = "q4d_caliber";
    pub const Q4E_SERIAL: &str = "q4e_serial";
    pub const Q5_AGENCY_NAME: &str = "q5_agencyName";
    pub const Q5_OFFICIAL_NAME: &str = "q5_officialName";
    pub const Q5_OFFICIAL_TITLE: &str = "q5_officialTitle";
    pub const Q5_ADDRESS: &str = "q5_address";
    pub const Q6A_INTENT: &str = "q6a_intent";
    pub const Q6B_SELL: &str = "q6b_sell";
    pub const Q6C_INDICTMENT: &str = "q6c_indictment";
    pub const Q6D_CONVICTED: &str = "q6d_convicted";
    pub const Q6E_FUGITIVE: &str = "q6e_fugitive";
    pub const Q6F_USER: &str = "q6f_user";
    pub const Q6G_MENTAL: &str = "q6g_mental";
    pub const Q6H_DISHONORABLE: &str = "q6h_dishonorable";
    pub const Q6I_RESTRAINING: &str = "q6i_restraining";
    pub const Q6J_DOMESTIC: &str = "q6j_domestic";
    pub const Q6K_RENOUNCED: &str = "q6k_renounced";
    pub const Q6L_ILLEGAL: &str = "q6l_illegal";
    pub const Q6M1_NONIMMIGRANT: &str = "q6m1_nonimmigrant";
    pub const Q6M2_EXCEPTION: &str = "q6m2_exception";
    pub const Q7_ALIEN_NUMBER: &str = "q7_alienNumber";
    pub const Q8_HAS_UPIN: &str = "q8_hasUpin";
    pub const Q8_UPIN_NUMBER: &str = "q8_upinNumber";
    pub const Q9A_CITIZENSHIP: &str = "q9a_citizenship";
    pub const Q9A_CITIZENSHIP_OTHER: &str = "q9a_citizenship_other";
    pub const Q9B_BIRTH_STATE: &str = "q9b_birthState";
    pub const Q9C_BIRTH_COUNTRY: &str = "q9c_birthCountry";
    pub const Q9C_BIRTH_COUNTRY_OTHER: &str = "q9c_birthCountry_other";
    pub const CERTIFICATION_DATE: &str = "certificationDate";

    /// The yes/no prohibitor questions, page order (6a through 6m.1).
    pub const PROHIBITOR_KEYS: &[&str] = &[
        Q6A_INTENT,
        Q6B_SELL,
        Q6C_INDICTMENT,
        Q6D_CONVICTED,
        Q6E_FUGITIVE,
        Q6F_USER,
        Q6G_MENTAL,
        Q6H_DISHONORABLE,
        Q6I_RESTRAINING,
        Q6J_DOMESTIC,
        Q6K_RENOUNCED,
        Q6L_ILLEGAL,
        Q6M1_NONIMMIGRANT,
    ];
}

/// Single- or multi-line text input. `max_lines` carries the page's
/// textarea line cap, enforced when the value is captured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextControl {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckboxControl {
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckGroupControl {
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checked: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RadioGroupControl {
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_options: Vec<String>,
}

/// Date input holding the page's raw `YYYY-MM-DD` string (possibly empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DateControl {
    #[serde(default)]
    pub value: String,
}

/// State of one page control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Text(TextControl),
    Checkbox(CheckboxControl),
    CheckGroup(CheckGroupControl),
    RadioGroup(RadioGroupControl),
    DateInput(DateControl),
}

/// Live snapshot of the questionnaire page's controls, keyed by control
/// name. The catalog of controls is fixed; hosts serialize this across the
/// boundary, mutate values, and rely on [`ControlSet::refresh`] to keep
/// dependent enable/disable state consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ControlSet {
    controls: BTreeMap<String, Control>,
}

fn text() -> Control {
    Control::Text(TextControl::default())
}

fn disabled_text() -> Control {
    Control::Text(TextControl {
        disabled: true,
        ..TextControl::default()
    })
}

fn textarea(max_lines: u8) -> Control {
    Control::Text(TextControl {
        max_lines: Some(max_lines),
        ..TextControl::default()
    })
}

fn checkbox(checked: bool) -> Control {
    Control::Checkbox(CheckboxControl { checked })
}

fn check_group(options: &[&str]) -> Control {
    Control::CheckGroup(CheckGroupControl {
        options: options.iter().map(|o| o.to_string()).collect(),
        checked: Vec::new(),
    })
}

fn radio(options: &[&str]) -> Control {
    Control::RadioGroup(RadioGroupControl {
        options: options.iter().map(|o| o.to_string()).collect(),
        selected: None,
        disabled_options: Vec::new(),
    })
}

fn date_input() -> Control {
    Control::DateInput(DateControl::default())
}

impl ControlSet {
    /// Builds the full control catalog of the questionnaire page in its
    /// pristine state (dependency effects already applied).
    pub fn questionnaire() -> Self {
        let mut set = ControlSet::default();
        set.insert(keys::Q1_FORM_TYPE, radio(FORM_TYPE_TOKENS));
        set.insert(keys::Q2_FULL_NAME, text());
        set.insert(keys::Q2_ADDRESS, textarea(2));
        set.insert(keys::Q3A_FULL_NAME, text());
        set.insert(keys::Q3A_HOME_ADDRESS, textarea(7));
        set.insert(keys::Q3A_SAME_AS_2, checkbox(true));
        set.insert(keys::Q3B_TELEPHONE, text());
        set.insert(keys::Q3C_EMAIL, text());
        set.insert(keys::Q3D_OTHER_NAMES, textarea(2));
        set.insert(keys::Q3F_SSN, text());
        set.insert(keys::Q3G_DOB, date_input());
        set.insert(keys::Q3H_ETHNICITY, radio(ETHNICITY_TOKENS));
        set.insert(keys::Q3I_RACE, radio(RACE_TOKENS));
        set.insert(keys::Q4A_FIREARM_TYPE, radio(FIREARM_TYPE_TOKENS));
        set.insert(keys::Q4A_FIREARM_TYPE_OTHER, disabled_text());
        set.insert(keys::Q4B_NAME, text());
        set.insert(keys::Q4B_ADDRESS, textarea(2));
        set.insert(keys::Q4C_MODEL, text());
        set.insert(keys::Q4D_CALIBER, text());
        set.insert(keys::Q4E_SERIAL, text());
        set.insert(keys::Q5_AGENCY_NAME, text());
        set.insert(keys::Q5_OFFICIAL_NAME, text());
        set.insert(keys::Q5_OFFICIAL_TITLE, text());
        set.insert(keys::Q5_ADDRESS, textarea(2));
        for key in keys::PROHIBITOR_KEYS {
            set.insert(key, radio(YES_NO_TOKENS));
        }
        set.insert(keys::Q6M2_EXCEPTION, radio(EXCEPTION_TOKENS));
        set.insert(keys::Q7_ALIEN_NUMBER, text());
        set.insert(keys::Q8_HAS_UPIN, radio(YES_NO_TOKENS));
        set.insert(keys::Q8_UPIN_NUMBER, disabled_text());
        set.insert(keys::Q9A_CITIZENSHIP, check_group(COUNTRY_TOKENS));
        set.insert(keys::Q9A_CITIZENSHIP_OTHER, disabled_text());
        set.insert(keys::Q9B_BIRTH_STATE, text());
        set.insert(keys::Q9C_BIRTH_COUNTRY, radio(COUNTRY_TOKENS));
        set.insert(keys::Q9C_BIRTH_COUNTRY_OTHER, disabled_text());
        set.insert(keys::CERTIFICATION_DATE, date_input());
        set.refresh();
        set
    }

    fn insert(&mut self, key: &str, control: Control) {
        self.controls.insert(key.to_string(), control);
    }

    pub fn get(&self, key: &str) -> Option<&Control> {
        self.controls.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Control> {
        self.controls.get_mut(key)
    }

    /// Page defaults that depend on the current date: a blank certification
    /// date starts out as today.
    pub fn apply_defaults(&mut self, today: Date) {
        if self.date_value(keys::CERTIFICATION_DATE).is_none() {
            self.set_date(keys::CERTIFICATION_DATE, Some(today));
        }
        self.refresh();
    }

    /// Re-evaluates the dependent-control rules against the current values.
    pub fn refresh(&mut self) {
        deps::refresh(self);
    }

    /// Restores every control to its catalog default.
    pub fn reset(&mut self) {
        *self = ControlSet::questionnaire();
    }

    /// Restores the controls of one question group (by key prefix, e.g.
    /// `"q4"` or `"q3a"`) to their catalog defaults.
    pub fn reset_question(&mut self, prefix: &str) {
        let defaults = ControlSet::questionnaire();
        for (key, control) in defaults.controls {
            if key.starts_with(prefix) && self.controls.contains_key(&key) {
                self.controls.insert(key, control);
            }
        }
        self.refresh();
    }

    /// Answers NO to every prohibitor question and N/A to the nonimmigrant
    /// exception, the way the page's bulk button does.
    pub fn answer_all_prohibitors_no(&mut self) {
        for key in keys::PROHIBITOR_KEYS {
            self.set_radio(key, Some("NO"));
        }
        self.set_radio(keys::Q6M2_EXCEPTION, Some("N/A"));
        self.refresh();
    }

    // --- value accessors ---

    /// Uppercased, line-capped text value; `None` for disabled or empty
    /// controls.
    pub fn text_value(&self, key: &str) -> Option<String> {
        let Some(Control::Text(control)) = self.get(key) else {
            return None;
        };
        if control.disabled || control.value.is_empty() {
            return None;
        }
        let value = control.value.to_uppercase();
        Some(match control.max_lines {
            Some(limit) => clamp_lines(&value, limit as usize),
            None => value,
        })
    }

    /// Raw text value regardless of enablement, as validation sees it.
    pub fn raw_value(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Control::Text(control)) => Some(control.value.as_str()),
            Some(Control::DateInput(control)) => Some(control.value.as_str()),
            _ => None,
        }
    }

    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(Control::Text(control)) = self.get_mut(key) {
            control.value = value.to_uppercase();
        }
    }

    pub fn checkbox_checked(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Control::Checkbox(control)) if control.checked)
    }

    pub fn set_checked(&mut self, key: &str, checked: bool) {
        if let Some(Control::Checkbox(control)) = self.get_mut(key) {
            control.checked = checked;
        }
    }

    /// The selected radio token, unless that option is currently disabled.
    pub fn radio_selected(&self, key: &str) -> Option<&str> {
        if let Some(Control::RadioGroup(group)) = self.get(key)
            && let Some(selected) = group.selected.as_deref()
            && !group.disabled_options.iter().any(|option| option == selected)
        {
            return Some(selected);
        }
        None
    }

    /// Selects a radio option; tokens outside the declared options leave the
    /// group unselected, like assigning an unknown value to a page radio.
    pub fn set_radio(&mut self, key: &str, token: Option<&str>) {
        if let Some(Control::RadioGroup(group)) = self.get_mut(key) {
            group.selected = token
                .filter(|token| group.options.iter().any(|option| option == token))
                .map(str::to_string);
        }
    }

    /// Checked group members, normalized to the declared option order.
    pub fn group_checked(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Control::CheckGroup(group)) => group
                .options
                .iter()
                .filter(|option| group.checked.iter().any(|checked| checked == *option))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn set_group(&mut self, key: &str, tokens: &[String]) {
        if let Some(Control::CheckGroup(group)) = self.get_mut(key) {
            group.checked = group
                .options
                .iter()
                .filter(|option| tokens.iter().any(|token| token == *option))
                .cloned()
                .collect();
        }
    }

    pub fn date_value(&self, key: &str) -> Option<Date> {
        let Some(Control::DateInput(control)) = self.get(key) else {
            return None;
        };
        if control.value.is_empty() {
            return None;
        }
        match Date::parse(&control.value, ISO_DATE) {
            Ok(date) => Some(date),
            Err(error) => {
                tracing::debug!(control = key, %error, "ignoring unparseable date input");
                None
            }
        }
    }

    pub fn set_date(&mut self, key: &str, date: Option<Date>) {
        if let Some(Control::DateInput(control)) = self.get_mut(key) {
            control.value = match date {
                Some(date) => iso_string(date),
                None => String::new(),
            };
        }
    }

    // --- record codec ---

    /// Captures the canonical answer record from the current control values.
    ///
    /// `today` is needed for the certification-date convention: the date is
    /// recorded only when it differs from today, so "today" is never baked
    /// into a persisted token.
    pub fn capture_record(&self, today: Date) -> AnswerRecord {
        AnswerRecord {
            form_type: self.radio_choice(keys::Q1_FORM_TYPE),
            transferee_name: self.text_value(keys::Q2_FULL_NAME),
            transferee_address: self.text_value(keys::Q2_ADDRESS),
            responsible_name: self.text_value(keys::Q3A_FULL_NAME),
            responsible_home_address: self.text_value(keys::Q3A_HOME_ADDRESS),
            same_address_as_transferee: self.same_as_flag(),
            telephone: self.text_value(keys::Q3B_TELEPHONE),
            email: self.text_value(keys::Q3C_EMAIL),
            other_names: self.text_value(keys::Q3D_OTHER_NAMES),
            ssn: self.text_value(keys::Q3F_SSN),
            date_of_birth: self.date_value(keys::Q3G_DOB),
            ethnicity: self.radio_choice(keys::Q3H_ETHNICITY),
            race: self.radio_choice(keys::Q3I_RACE),
            firearm_type: self.radio_choice(keys::Q4A_FIREARM_TYPE),
            firearm_type_other: self
                .other_text(keys::Q4A_FIREARM_TYPE_OTHER, keys::Q4A_FIREARM_TYPE),
            maker_name: self.text_value(keys::Q4B_NAME),
            maker_address: self.text_value(keys::Q4B_ADDRESS),
            model: self.text_value(keys::Q4C_MODEL),
            caliber: self.text_value(keys::Q4D_CALIBER),
            serial_number: self.text_value(keys::Q4E_SERIAL),
            agency_name: self.text_value(keys::Q5_AGENCY_NAME),
            official_name: self.text_value(keys::Q5_OFFICIAL_NAME),
            official_title: self.text_value(keys::Q5_OFFICIAL_TITLE),
            agency_address: self.text_value(keys::Q5_ADDRESS),
            transfer_intent: self.radio_choice(keys::Q6A_INTENT),
            resale_intent: self.radio_choice(keys::Q6B_SELL),
            under_indictment: self.radio_choice(keys::Q6C_INDICTMENT),
            felony_conviction: self.radio_choice(keys::Q6D_CONVICTED),
            fugitive: self.radio_choice(keys::Q6E_FUGITIVE),
            controlled_substance_user: self.radio_choice(keys::Q6F_USER),
            adjudicated_mentally_defective: self.radio_choice(keys::Q6G_MENTAL),
            dishonorable_discharge: self.radio_choice(keys::Q6H_DISHONORABLE),
            restraining_order: self.radio_choice(keys::Q6I_RESTRAINING),
            domestic_violence_conviction: self.radio_choice(keys::Q6J_DOMESTIC),
            renounced_citizenship: self.radio_choice(keys::Q6K_RENOUNCED),
            unlawful_presence: self.radio_choice(keys::Q6L_ILLEGAL),
            nonimmigrant_visa: self.radio_choice(keys::Q6M1_NONIMMIGRANT),
            nonimmigrant_exception: self.radio_choice(keys::Q6M2_EXCEPTION),
            alien_number: self.text_value(keys::Q7_ALIEN_NUMBER),
            has_upin: self.radio_choice(keys::Q8_HAS_UPIN),
            upin_number: self.text_value(keys::Q8_UPIN_NUMBER),
            citizenship: self.group_choices(keys::Q9A_CITIZENSHIP),
            citizenship_other: self
                .other_text(keys::Q9A_CITIZENSHIP_OTHER, keys::Q9A_CITIZENSHIP),
            birth_state: self.text_value(keys::Q9B_BIRTH_STATE),
            birth_country: self.radio_choice(keys::Q9C_BIRTH_COUNTRY),
            birth_country_other: self
                .other_text(keys::Q9C_BIRTH_COUNTRY_OTHER, keys::Q9C_BIRTH_COUNTRY),
            certification_date: self
                .date_value(keys::CERTIFICATION_DATE)
                .filter(|date| *date != today),
        }
    }

    /// Mutates the controls to reflect `record`, the exact inverse of
    /// [`ControlSet::capture_record`]. Keys absent from the record clear
    /// their control; dependent enable/disable state is re-derived.
    pub fn restore_record(&mut self, record: &AnswerRecord) {
        self.set_radio_choice(keys::Q1_FORM_TYPE, record.form_type.as_ref());
        self.set_text_opt(keys::Q2_FULL_NAME, record.transferee_name.as_deref());
        self.set_text_opt(keys::Q2_ADDRESS, record.transferee_address.as_deref());
        self.set_text_opt(keys::Q3A_FULL_NAME, record.responsible_name.as_deref());
        self.set_text_opt(
            keys::Q3A_HOME_ADDRESS,
            record.responsible_home_address.as_deref(),
        );
        self.set_checked(keys::Q3A_SAME_AS_2, record.same_address_active());
        self.set_text_opt(keys::Q3B_TELEPHONE, record.telephone.as_deref());
        self.set_text_opt(keys::Q3C_EMAIL, record.email.as_deref());
        self.set_text_opt(keys::Q3D_OTHER_NAMES, record.other_names.as_deref());
        self.set_text_opt(keys::Q3F_SSN, record.ssn.as_deref());
        self.set_date(keys::Q3G_DOB, record.date_of_birth);
        self.set_radio_choice(keys::Q3H_ETHNICITY, record.ethnicity.as_ref());
        self.set_radio_choice(keys::Q3I_RACE, record.race.as_ref());
        self.set_radio_choice(keys::Q4A_FIREARM_TYPE, record.firearm_type.as_ref());
        self.set_text_opt(
            keys::Q4A_FIREARM_TYPE_OTHER,
            record.firearm_type_other.as_deref(),
        );
        self.set_text_opt(keys::Q4B_NAME, record.maker_name.as_deref());
        self.set_text_opt(keys::Q4B_ADDRESS, record.maker_address.as_deref());
        self.set_text_opt(keys::Q4C_MODEL, record.model.as_deref());
        self.set_text_opt(keys::Q4D_CALIBER, record.caliber.as_deref());
        self.set_text_opt(keys::Q4E_SERIAL, record.serial_number.as_deref());
        self.set_text_opt(keys::Q5_AGENCY_NAME, record.agency_name.as_deref());
        self.set_text_opt(keys::Q5_OFFICIAL_NAME, record.official_name.as_deref());
        self.set_text_opt(keys::Q5_OFFICIAL_TITLE, record.official_title.as_deref());
        self.set_text_opt(keys::Q5_ADDRESS, record.agency_address.as_deref());
        self.set_radio_choice(keys::Q6A_INTENT, record.transfer_intent.as_ref());
        self.set_radio_choice(keys::Q6B_SELL, record.resale_intent.as_ref());
        self.set_radio_choice(keys::Q6C_INDICTMENT, record.under_indictment.as_ref());
        self.set_radio_choice(keys::Q6D_CONVICTED, record.felony_conviction.as_ref());
        self.set_radio_choice(keys::Q6E_FUGITIVE, record.fugitive.as_ref());
        self.set_radio_choice(keys::Q6F_USER, record.controlled_substance_user.as_ref());
        self.set_radio_choice(
            keys::Q6G_MENTAL,
            record.adjudicated_mentally_defective.as_ref(),
        );
        self.set_radio_choice(
            keys::Q6H_DISHONORABLE,
            record.dishonorable_discharge.as_ref(),
        );
        self.set_radio_choice(keys::Q6I_RESTRAINING, record.restraining_order.as_ref());
        self.set_radio_choice(
            keys::Q6J_DOMESTIC,
            record.domestic_violence_conviction.as_ref(),
        );
        self.set_radio_choice(keys::Q6K_RENOUNCED, record.renounced_citizenship.as_ref());
        self.set_radio_choice(keys::Q6L_ILLEGAL, record.unlawful_presence.as_ref());
        self.set_radio_choice(keys::Q6M1_NONIMMIGRANT, record.nonimmigrant_visa.as_ref());
        self.set_radio_choice(
            keys::Q6M2_EXCEPTION,
            record.nonimmigrant_exception.as_ref(),
        );
        self.set_text_opt(keys::Q7_ALIEN_NUMBER, record.alien_number.as_deref());
        self.set_radio_choice(keys::Q8_HAS_UPIN, record.has_upin.as_ref());
        self.set_text_opt(keys::Q8_UPIN_NUMBER, record.upin_number.as_deref());
        let citizenship: Vec<String> = record
            .citizenship
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(token_of)
            .collect();
        self.set_group(keys::Q9A_CITIZENSHIP, &citizenship);
        self.set_text_opt(
            keys::Q9A_CITIZENSHIP_OTHER,
            record.citizenship_other.as_deref(),
        );
        self.set_text_opt(keys::Q9B_BIRTH_STATE, record.birth_state.as_deref());
        self.set_radio_choice(keys::Q9C_BIRTH_COUNTRY, record.birth_country.as_ref());
        self.set_text_opt(
            keys::Q9C_BIRTH_COUNTRY_OTHER,
            record.birth_country_other.as_deref(),
        );
        self.set_date(keys::CERTIFICATION_DATE, record.certification_date);
        self.refresh();
    }

    // --- helpers ---

    fn set_text_opt(&mut self, key: &str, value: Option<&str>) {
        self.set_text(key, value.unwrap_or(""));
    }

    fn radio_choice<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.radio_selected(key).and_then(|token| parse_token(token))
    }

    fn set_radio_choice<T: serde::Serialize>(&mut self, key: &str, choice: Option<&T>) {
        let token = choice.map(token_of);
        self.set_radio(key, token.as_deref());
    }

    fn group_choices<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let parsed: Vec<T> = self
            .group_checked(key)
            .iter()
            .filter_map(|token| parse_token(token))
            .collect();
        (!parsed.is_empty()).then_some(parsed)
    }

    /// The asymmetric "same address" convention: checked is the default and
    /// stays unrecorded, only an explicit uncheck is captured.
    fn same_as_flag(&self) -> TriState {
        if self.checkbox_checked(keys::Q3A_SAME_AS_2) {
            TriState::Unset
        } else {
            TriState::False
        }
    }

    /// Companion "other" text, captured only while its selector control has
    /// the OTHER option active.
    fn other_text(&self, key: &str, selector: &str) -> Option<String> {
        let selected = match self.get(selector) {
            Some(Control::RadioGroup(_)) => {
                self.radio_selected(selector) == Some(choices::OTHER_TOKEN)
            }
            Some(Control::CheckGroup(group)) => {
                group.checked.iter().any(|token| token == choices::OTHER_TOKEN)
            }
            _ => false,
        };
        if selected { self.text_value(key) } else { None }
    }
}

fn clamp_lines(value: &str, limit: usize) -> String {
    let lines: Vec<&str> = value.split('\n').take(limit).collect();
    lines.join("\n")
}

fn iso_string(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
