//! Maps an answer record onto named PDF form fields.
//!
//! The mapping is pure: given a record and today's date it produces an
//! ordered list of field writes, without touching any document. Field names
//! here are the applicant-copy names; the fill pass duplicates every write
//! onto the CLEO copy.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::Date;

use rpq_form::choices::token_of;
use rpq_form::{
    AnswerRecord, BirthCountry, CountryOfCitizenship, Ethnicity, ExceptionAnswer, FirearmType,
    FormType, Race, YesNo,
};

/// One operation against a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FieldOp {
    SetText { value: String },
    SetChoice { value: String },
    /// Activate a checkbox or radio button, as opposed to writing the
    /// literal text "SELECTED" anywhere.
    Select,
}

impl FieldOp {
    pub fn text(value: impl Into<String>) -> Self {
        FieldOp::SetText {
            value: value.into(),
        }
    }

    pub fn choice(value: impl Into<String>) -> Self {
        FieldOp::SetChoice {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldWrite {
    pub field: String,
    #[serde(flatten)]
    pub op: FieldOp,
}

/// Ordered field writes, at most one per field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FieldMapping {
    writes: Vec<FieldWrite>,
}

impl FieldMapping {
    /// Appends a write. A second write to the same field is a mapping bug;
    /// the first one stands and the duplicate is dropped with a warning.
    pub fn set(&mut self, field: &str, op: FieldOp) {
        if self.writes.iter().any(|write| write.field == field) {
            tracing::warn!(field, "ignoring duplicate write to mapped field");
            return;
        }
        self.writes.push(FieldWrite {
            field: field.to_string(),
            op,
        });
    }

    pub fn writes(&self) -> &[FieldWrite] {
        &self.writes
    }

    pub fn get(&self, field: &str) -> Option<&FieldOp> {
        self.writes
            .iter()
            .find(|write| write.field == field)
            .map(|write| &write.op)
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Builds the field writes for `record`. `today` fills the certification
/// date when the record does not carry one.
pub fn map_record(record: &AnswerRecord, today: Date) -> FieldMapping {
    let mut mapping = FieldMapping::default();
    map_form_type(record, &mut mapping);
    map_applicant(record, &mut mapping);
    map_responsible_person(record, &mut mapping);
    map_firearm(record, &mut mapping);
    map_law_enforcement(record, &mut mapping);
    map_prohibitors(record, &mut mapping);
    map_alien_number(record, &mut mapping);
    map_upin(record, &mut mapping);
    map_citizenship(record, &mut mapping);
    map_birthplace(record, &mut mapping);
    map_certification(record, today, &mut mapping);
    mapping
}

fn map_form_type(record: &AnswerRecord, mapping: &mut FieldMapping) {
    if let Some(form_type) = record.form_type {
        let widget = match form_type {
            FormType::Form1 => "topmostSubform[0].Page1[0].form1[0]",
            FormType::Form4 => "topmostSubform[0].Page1[0].form4[0]",
            FormType::Form5 => "topmostSubform[0].Page1[0].form5[0]",
        };
        mapping.set(widget, FieldOp::Select);
    }
}

fn map_applicant(record: &AnswerRecord, mapping: &mut FieldMapping) {
    let info = join_lines(&[
        record.transferee_name.as_deref(),
        record.transferee_address.as_deref(),
    ]);
    if !info.is_empty() {
        mapping.set(
            "topmostSubform[0].Page1[0].applicantaddress[0]",
            FieldOp::text(info),
        );
    }
}

fn map_responsible_person(record: &AnswerRecord, mapping: &mut FieldMapping) {
    let mut home_address = record
        .responsible_home_address
        .clone()
        .unwrap_or_default();
    // "Same as 2" inherits the transferee address when no home address was
    // given separately.
    if record.same_address_active()
        && home_address.is_empty()
        && let Some(address) = record.transferee_address.as_deref()
    {
        home_address = address.to_string();
    }
    let info = join_lines(&[
        record.responsible_name.as_deref(),
        Some(home_address.as_str()),
    ]);
    if !info.is_empty() {
        mapping.set(
            "topmostSubform[0].Page1[0].responsibleaddress[0]",
            FieldOp::text(info),
        );
    }

    set_text_answer(
        mapping,
        "topmostSubform[0].Page1[0].telephone[0]",
        record.telephone.as_deref(),
    );
    set_text_answer(
        mapping,
        "topmostSubform[0].Page1[0].email[0]",
        record.email.as_deref(),
    );
    set_text_answer(
        mapping,
        "topmostSubform[0].Page1[0].othernames[0]",
        record.other_names.as_deref(),
    );
    set_text_answer(
        mapping,
        "topmostSubform[0].Page1[0].ssn2f[0]",
        record.ssn.as_deref(),
    );

    if let Some(dob) = record.date_of_birth {
        // The date-of-birth control has no usable name in the template, only
        // its positional one.
        mapping.set(
            "topmostSubform[0].Page1[0].#field[24]",
            FieldOp::text(format_mdy(dob)),
        );
    }

    if let Some(ethnicity) = record.ethnicity {
        let widget = match ethnicity {
            Ethnicity::HispanicOrLatino => "topmostSubform[0].Page1[0].ehl[0]",
            Ethnicity::NotHispanicOrLatino => "topmostSubform[0].Page1[0].nhl[0]",
        };
        mapping.set(widget, FieldOp::Select);
    }

    if let Some(race) = record.race {
        let widget = match race {
            Race::AmericanIndianOrAlaskaNative => "topmostSubform[0].Page1[0].aian[0]",
            Race::Asian => "topmostSubform[0].Page1[0].a[0]",
            Race::BlackOrAfricanAmerican => "topmostSubform[0].Page1[0].baa[0]",
            Race::NativeHawaiianOrPacificIslander => "topmostSubform[0].Page1[0].nhopi[0]",
            Race::White => "topmostSubform[0].Page1[0].w[0]",
        };
        mapping.set(widget, FieldOp::Select);
    }
}

fn map_firearm(record: &AnswerRecord, mapping: &mut FieldMapping) {
    if let Some(kind) = record.firearm_type {
        let mut value = token_of(&kind);
        // The OTHER choice prints its free-text description instead of the
        // word OTHER, when one was given.
        if kind == FirearmType::Other
            && let Some(other) = record.firearm_type_other.as_deref()
            && !other.is_empty()
        {
            value = other.to_uppercase();
        }
        mapping.set(
            "topmostSubform[0].Page1[0].firearmtype[0]",
            FieldOp::text(value),
        );
    }

    let maker = join_lines(&[
        record.maker_name.as_deref(),
        record.maker_address.as_deref(),
    ]);
    if !maker.is_empty() {
        mapping.set(
            "topmostSubform[0].Page1[0].importeraddress[0]",
            FieldOp::text(maker),
        );
    }

    set_text_answer(
        mapping,
        "topmostSubform[0].Page1[0].Model[0]",
        record.model.as_deref(),
    );
    set_text_answer(
        mapping,
        "topmostSubform[0].Page1[0].caliber[0]",
        record.caliber.as_deref(),
    );
    set_text_answer(
        mapping,
        "topmostSubform[0].Page1[0].serial[0]",
        record.serial_number.as_deref(),
    );
}

/// Question 5 compacts agency, official and address onto three lines with
/// no gaps: the first present value always lands on the first line.
fn map_law_enforcement(record: &AnswerRecord, mapping: &mut FieldMapping) {
    let official = record
        .official_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| {
            match record
                .official_title
                .as_deref()
                .filter(|title| !title.is_empty())
            {
                Some(title) => format!("{}, {}", name.to_uppercase(), title.to_uppercase()),
                None => name.to_uppercase(),
            }
        });
    let lines: Vec<String> = [
        record.agency_name.as_deref().map(str::to_uppercase),
        official,
        record.agency_address.as_deref().map(str::to_uppercase),
    ]
    .into_iter()
    .flatten()
    .filter(|line| !line.is_empty())
    .collect();

    let widgets = [
        "topmostSubform[0].Page1[0].TextField3[0]",
        "topmostSubform[0].Page1[0].TextField4[0]",
        "topmostSubform[0].Page1[0].TextField5[0]",
    ];
    for (line, widget) in lines.into_iter().zip(widgets) {
        mapping.set(widget, FieldOp::text(line));
    }
}

type ProhibitorAnswer = fn(&AnswerRecord) -> Option<YesNo>;

/// Question 6 yes/no pairs, page order. Each answer activates exactly one
/// of the two checkboxes.
const PROHIBITORS: &[(ProhibitorAnswer, &str, &str)] = &[
    (
        |record| record.transfer_intent,
        "topmostSubform[0].Page2[0].CheckBoxYes6a[0]",
        "topmostSubform[0].Page2[0].CheckBoxno6a[0]",
    ),
    (
        |record| record.resale_intent,
        "topmostSubform[0].Page2[0].CheckBoxYes6b[0]",
        "topmostSubform[0].Page2[0].CheckBoxno6b[0]",
    ),
    (
        |record| record.under_indictment,
        "topmostSubform[0].Page2[0].CheckBoxYes1[0]",
        "topmostSubform[0].Page2[0].CheckBoxno1[0]",
    ),
    (
        |record| record.felony_conviction,
        "topmostSubform[0].Page2[0].CheckBoxYes2[0]",
        "topmostSubform[0].Page2[0].CheckBoxno2[0]",
    ),
    (
        |record| record.fugitive,
        "topmostSubform[0].Page2[0].CheckBoxYes3[0]",
        "topmostSubform[0].Page2[0].CheckBoxno3[0]",
    ),
    (
        |record| record.controlled_substance_user,
        "topmostSubform[0].Page2[0].CheckBoxYes4[0]",
        "topmostSubform[0].Page2[0].CheckBoxno4[0]",
    ),
    (
        |record| record.adjudicated_mentally_defective,
        "topmostSubform[0].Page2[0].CheckBoxYes5[0]",
        "topmostSubform[0].Page2[0].CheckBoxno5[0]",
    ),
    (
        |record| record.dishonorable_discharge,
        "topmostSubform[0].Page2[0].CheckBoxYes6[0]",
        "topmostSubform[0].Page2[0].CheckBoxno6[0]",
    ),
    (
        |record| record.restraining_order,
        "topmostSubform[0].Page2[0].CheckBoxYes7[0]",
        "topmostSubform[0].Page2[0].CheckBoxno7[0]",
    ),
    (
        |record| record.domestic_violence_conviction,
        "topmostSubform[0].Page2[0].CheckBoxYes8[0]",
        "topmostSubform[0].Page2[0].CheckBoxno8[0]",
    ),
    (
        |record| record.renounced_citizenship,
        "topmostSubform[0].Page2[0].CheckBoxYes9[0]",
        "topmostSubform[0].Page2[0].CheckBoxno9[0]",
    ),
    (
        |record| record.unlawful_presence,
        "topmostSubform[0].Page2[0].CheckBoxYes10[0]",
        "topmostSubform[0].Page2[0].CheckBoxno10[0]",
    ),
    (
        |record| record.nonimmigrant_visa,
        "topmostSubform[0].Page2[0].CheckBoxYes11[0]",
        "topmostSubform[0].Page2[0].CheckBoxno11[0]",
    ),
];

fn map_prohibitors(record: &AnswerRecord, mapping: &mut FieldMapping) {
    for (answer, yes_widget, no_widget) in PROHIBITORS {
        match answer(record) {
            Some(YesNo::Yes) => mapping.set(yes_widget, FieldOp::Select),
            Some(YesNo::No) => mapping.set(no_widget, FieldOp::Select),
            None => {}
        }
    }

    if let Some(exception) = record.nonimmigrant_exception {
        let widget = match exception {
            ExceptionAnswer::Yes => "topmostSubform[0].Page2[0].CheckBoxYes12[0]",
            ExceptionAnswer::No => "topmostSubform[0].Page2[0].CheckBoxno12[0]",
            ExceptionAnswer::NotApplicable => "topmostSubform[0].Page2[0].CheckBoxNA[0]",
        };
        mapping.set(widget, FieldOp::Select);
    }
}

fn map_alien_number(record: &AnswerRecord, mapping: &mut FieldMapping) {
    set_text_answer(
        mapping,
        "topmostSubform[0].Page2[0].TextFieldalien[0]",
        record.alien_number.as_deref(),
    );
}

fn map_upin(record: &AnswerRecord, mapping: &mut FieldMapping) {
    match record.has_upin {
        Some(YesNo::Yes) => {
            mapping.set("topmostSubform[0].Page2[0].yes17[0]", FieldOp::Select);
            set_text_answer(
                mapping,
                "topmostSubform[0].Page2[0].please17[0]",
                record.upin_number.as_deref(),
            );
        }
        Some(YesNo::No) => {
            mapping.set("topmostSubform[0].Page2[0].no17[0]", FieldOp::Select);
        }
        None => {}
    }
}

fn map_citizenship(record: &AnswerRecord, mapping: &mut FieldMapping) {
    let Some(citizenship) = record.citizenship.as_deref() else {
        return;
    };
    if citizenship.contains(&CountryOfCitizenship::Usa) {
        mapping.set(
            "topmostSubform[0].Page2[0].usacheckbox[0]",
            FieldOp::Select,
        );
    }
    // OTHER only counts together with a named country.
    if citizenship.contains(&CountryOfCitizenship::Other)
        && let Some(other) = record.citizenship_other.as_deref()
        && !other.is_empty()
    {
        mapping.set(
            "topmostSubform[0].Page2[0].othercountrycheckbox[0]",
            FieldOp::Select,
        );
        mapping.set(
            "topmostSubform[0].Page2[0].Othercountry[0]",
            FieldOp::text(other.to_uppercase()),
        );
    }
}

fn map_birthplace(record: &AnswerRecord, mapping: &mut FieldMapping) {
    set_text_answer(
        mapping,
        "topmostSubform[0].Page2[0].statebirth[0]",
        record.birth_state.as_deref(),
    );

    match record.birth_country {
        Some(BirthCountry::Usa) => {
            mapping.set(
                "topmostSubform[0].Page2[0].statecountry[0]",
                FieldOp::text("UNITED STATES OF AMERICA"),
            );
        }
        Some(BirthCountry::Other) => {
            if let Some(other) = record.birth_country_other.as_deref()
                && !other.is_empty()
            {
                mapping.set(
                    "topmostSubform[0].Page2[0].statecountry[0]",
                    FieldOp::text(other.to_uppercase()),
                );
            }
        }
        None => {}
    }
}

/// The certification date is always printed: the record's date when it has
/// one, today otherwise.
fn map_certification(record: &AnswerRecord, today: Date, mapping: &mut FieldMapping) {
    let date = record.certification_date.unwrap_or(today);
    mapping.set(
        "topmostSubform[0].Page2[0].DateField9[0]",
        FieldOp::text(format_mdy(date)),
    );
}

fn set_text_answer(mapping: &mut FieldMapping, widget: &str, value: Option<&str>) {
    if let Some(value) = value
        && !value.is_empty()
    {
        mapping.set(widget, FieldOp::text(value.to_uppercase()));
    }
}

/// Joins the present, non-empty parts with newlines, uppercasing each.
fn join_lines(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|part| part.to_uppercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `MM/DD/YYYY`, the way the printed form expects dates.
fn format_mdy(date: Date) -> String {
    format!(
        "{:02}/{:02}/{:04}",
        u8::from(date.month()),
        date.day(),
        date.year()
    )
}
