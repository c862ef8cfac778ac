use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Which ATF application the questionnaire accompanies (question 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum FormType {
    #[serde(rename = "ATF FORM 1")]
    Form1,
    #[serde(rename = "ATF FORM 4")]
    Form4,
    #[serde(rename = "ATF FORM 5")]
    Form5,
}

/// Question 3h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum Ethnicity {
    #[serde(rename = "HISPANIC OR LATINO")]
    HispanicOrLatino,
    #[serde(rename = "NOT HISPANIC OR LATINO")]
    NotHispanicOrLatino,
}

/// Question 3i.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum Race {
    #[serde(rename = "AMERICAN INDIAN OR ALASKA NATIVE")]
    AmericanIndianOrAlaskaNative,
    #[serde(rename = "ASIAN")]
    Asian,
    #[serde(rename = "BLACK OR AFRICAN AMERICAN")]
    BlackOrAfricanAmerican,
    #[serde(rename = "NATIVE HAWAIIAN OR OTHER PACIFIC ISLANDER")]
    NativeHawaiianOrPacificIslander,
    #[serde(rename = "WHITE")]
    White,
}

/// NFA firearm category (question 4a). OTHER routes the companion free-text
/// answer into the document instead of the token itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum FirearmType {
    #[serde(rename = "MACHINEGUN")]
    Machinegun,
    #[serde(rename = "SHORT-BARRELED RIFLE")]
    ShortBarreledRifle,
    #[serde(rename = "SHORT-BARRELED SHOTGUN")]
    ShortBarreledShotgun,
    #[serde(rename = "SILENCER")]
    Silencer,
    #[serde(rename = "DESTRUCTIVE DEVICE")]
    DestructiveDevice,
    #[serde(rename = "ANY OTHER WEAPON")]
    AnyOtherWeapon,
    #[serde(rename = "OTHER")]
    Other,
}

/// Answer to one prohibitor question (6a through 6m.1) or to question 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum YesNo {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

/// Answer to question 6m.2, which allows "not applicable" alongside yes/no.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum ExceptionAnswer {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
    #[serde(rename = "N/A")]
    NotApplicable,
}

/// One member of the multi-select citizenship answer (question 9a).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum CountryOfCitizenship {
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "OTHER")]
    Other,
}

/// Question 9c.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize, JsonSchema)]
pub enum BirthCountry {
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "OTHER")]
    Other,
}

/// The token shared by every "other, specify below" selector.
pub const OTHER_TOKEN: &str = "OTHER";

/// Option lists offered by the page, in display order. The control catalog
/// is built from these; every entry must parse back into its enum.
pub const FORM_TYPE_TOKENS: &[&str] = &["ATF FORM 1", "ATF FORM 4", "ATF FORM 5"];
pub const ETHNICITY_TOKENS: &[&str] = &["HISPANIC OR LATINO", "NOT HISPANIC OR LATINO"];
pub const RACE_TOKENS: &[&str] = &[
    "AMERICAN INDIAN OR ALASKA NATIVE",
    "ASIAN",
    "BLACK OR AFRICAN AMERICAN",
    "NATIVE HAWAIIAN OR OTHER PACIFIC ISLANDER",
    "WHITE",
];
pub const FIREARM_TYPE_TOKENS: &[&str] = &[
    "MACHINEGUN",
    "SHORT-BARRELED RIFLE",
    "SHORT-BARRELED SHOTGUN",
    "SILENCER",
    "DESTRUCTIVE DEVICE",
    "ANY OTHER WEAPON",
    "OTHER",
];
pub const YES_NO_TOKENS: &[&str] = &["YES", "NO"];
pub const EXCEPTION_TOKENS: &[&str] = &["YES", "NO", "N/A"];
pub const COUNTRY_TOKENS: &[&str] = &["USA", "OTHER"];

/// Serializes a choice into its wire token.
pub fn token_of<T: Serialize>(choice: &T) -> String {
    match serde_json::to_value(choice) {
        Ok(Value::String(token)) => token,
        _ => String::new(),
    }
}

/// Parses a wire token back into a choice; `None` for anything outside the
/// declared enumeration.
pub fn parse_token<T: DeserializeOwned>(token: &str) -> Option<T> {
    serde_json::from_value(Value::String(token.to_string())).ok()
}
