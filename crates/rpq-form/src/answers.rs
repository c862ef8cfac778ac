use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;

use crate::choices::{
    BirthCountry, CountryOfCitizenship, Ethnicity, ExceptionAnswer, FirearmType, FormType, Race,
    YesNo,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Three-state flag for the "same address as the transferee" checkbox.
///
/// The persisted shape is asymmetric on purpose: the flag is written only
/// when it is explicitly `false`, so an absent key means the checkbox is in
/// its default checked state. `Unset` models that absence, and anything
/// other than `False` counts as "same address".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    pub fn is_unset(&self) -> bool {
        matches!(self, TriState::Unset)
    }

    /// Resolves to a plain bool, with `default` standing in for `Unset`.
    pub fn resolve(&self, default: bool) -> bool {
        match self {
            TriState::Unset => default,
            TriState::True => true,
            TriState::False => false,
        }
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Unset never reaches the wire: the record skips it entirely.
        serializer.serialize_bool(!matches!(self, TriState::False))
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(if bool::deserialize(deserializer)? {
            TriState::True
        } else {
            TriState::False
        })
    }
}

impl JsonSchema for TriState {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "TriState".into()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        generator.subschema_for::<bool>()
    }
}

/// Canonical snapshot of the questionnaire's answers.
///
/// Field renames carry the control names the page has always used, so the
/// serialized form of this struct is exactly the payload of a state token
/// and existing saved links keep decoding. Absent keys mean "not answered";
/// free-text answers are stored uppercase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerRecord {
    #[serde(rename = "q1_formType", default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<FormType>,

    #[serde(rename = "q2_fullName", default, skip_serializing_if = "Option::is_none")]
    pub transferee_name: Option<String>,
    #[serde(rename = "q2_address", default, skip_serializing_if = "Option::is_none")]
    pub transferee_address: Option<String>,

    #[serde(rename = "q3a_fullName", default, skip_serializing_if = "Option::is_none")]
    pub responsible_name: Option<String>,
    #[serde(
        rename = "q3a_homeAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub responsible_home_address: Option<String>,
    #[serde(rename = "q3a_sameAs2", default, skip_serializing_if = "TriState::is_unset")]
    pub same_address_as_transferee: TriState,
    #[serde(
        rename = "q3b_telephone",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub telephone: Option<String>,
    #[serde(rename = "q3c_email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "q3d_otherNames",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub other_names: Option<String>,
    #[serde(rename = "q3f_ssn", default, skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(
        rename = "q3g_dob",
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub date_of_birth: Option<Date>,
    #[serde(
        rename = "q3h_ethnicity",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ethnicity: Option<Ethnicity>,
    #[serde(rename = "q3i_race", default, skip_serializing_if = "Option::is_none")]
    pub race: Option<Race>,

    #[serde(
        rename = "q4a_firearmType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub firearm_type: Option<FirearmType>,
    #[serde(
        rename = "q4a_firearmType_other",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub firearm_type_other: Option<String>,
    #[serde(rename = "q4b_name", default, skip_serializing_if = "Option::is_none")]
    pub maker_name: Option<String>,
    #[serde(rename = "q4b_address", default, skip_serializing_if = "Option::is_none")]
    pub maker_address: Option<String>,
    #[serde(rename = "q4c_model", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "q4d_caliber", default, skip_serializing_if = "Option::is_none")]
    pub caliber: Option<String>,
    #[serde(rename = "q4e_serial", default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(
        rename = "q5_agencyName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub agency_name: Option<String>,
    #[serde(
        rename = "q5_officialName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub official_name: Option<String>,
    #[serde(
        rename = "q5_officialTitle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub official_title: Option<String>,
    #[serde(rename = "q5_address", default, skip_serializing_if = "Option::is_none")]
    pub agency_address: Option<String>,

    #[serde(rename = "q6a_intent", default, skip_serializing_if = "Option::is_none")]
    pub transfer_intent: Option<YesNo>,
    #[serde(rename = "q6b_sell", default, skip_serializing_if = "Option::is_none")]
    pub resale_intent: Option<YesNo>,
    #[serde(
        rename = "q6c_indictment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub under_indictment: Option<YesNo>,
    #[serde(
        rename = "q6d_convicted",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub felony_conviction: Option<YesNo>,
    #[serde(rename = "q6e_fugitive", default, skip_serializing_if = "Option::is_none")]
    pub fugitive: Option<YesNo>,
    #[serde(rename = "q6f_user", default, skip_serializing_if = "Option::is_none")]
    pub controlled_substance_user: Option<YesNo>,
    #[serde(rename = "q6g_mental", default, skip_serializing_if = "Option::is_none")]
    pub adjudicated_mentally_defective: Option<YesNo>,
    #[serde(
        rename = "q6h_dishonorable",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dishonorable_discharge: Option<YesNo>,
    #[serde(
        rename = "q6i_restraining",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restraining_order: Option<YesNo>,
    #[serde(rename = "q6j_domestic", default, skip_serializing_if = "Option::is_none")]
    pub domestic_violence_conviction: Option<YesNo>,
    #[serde(
        rename = "q6k_renounced",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub renounced_citizenship: Option<YesNo>,
    #[serde(rename = "q6l_illegal", default, skip_serializing_if = "Option::is_none")]
    pub unlawful_presence: Option<YesNo>,
    #[serde(
        rename = "q6m1_nonimmigrant",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub nonimmigrant_visa: Option<YesNo>,
    #[serde(
        rename = "q6m2_exception",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub nonimmigrant_exception: Option<ExceptionAnswer>,

    #[serde(
        rename = "q7_alienNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alien_number: Option<String>,

    #[serde(rename = "q8_hasUpin", default, skip_serializing_if = "Option::is_none")]
    pub has_upin: Option<YesNo>,
    #[serde(
        rename = "q8_upinNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub upin_number: Option<String>,

    #[serde(
        rename = "q9a_citizenship",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub citizenship: Option<Vec<CountryOfCitizenship>>,
    #[serde(
        rename = "q9a_citizenship_other",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub citizenship_other: Option<String>,
    #[serde(
        rename = "q9b_birthState",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_state: Option<String>,
    #[serde(
        rename = "q9c_birthCountry",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_country: Option<BirthCountry>,
    #[serde(
        rename = "q9c_birthCountry_other",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_country_other: Option<String>,

    #[serde(
        rename = "certificationDate",
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub certification_date: Option<Date>,
}

impl AnswerRecord {
    /// True when no question has been answered.
    pub fn is_empty(&self) -> bool {
        *self == AnswerRecord::default()
    }

    /// True unless "same address as the transferee" was explicitly unchecked.
    pub fn same_address_active(&self) -> bool {
        self.same_address_as_transferee.resolve(true)
    }

    /// Serializes the record as indented JSON for debugging.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// JSON Schema for the canonical record, for host-side tooling.
pub fn answers_schema() -> schemars::Schema {
    schemars::schema_for!(AnswerRecord)
}

/// Accepts both the canonical list form and the bare-string form older
/// tokens used for a single checked citizenship box.
fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<CountryOfCitizenship>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(CountryOfCitizenship),
        Many(Vec<CountryOfCitizenship>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => None,
        Some(OneOrMany::One(value)) => Some(vec![value]),
        Some(OneOrMany::Many(values)) => Some(values),
    })
}
