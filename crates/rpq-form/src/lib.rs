#![allow(missing_docs)]

pub mod answers;
pub mod choices;
pub mod controls;
mod deps;
pub mod format;
pub mod token;
pub mod validate;

pub use answers::{AnswerRecord, TriState, answers_schema};
pub use choices::{
    BirthCountry, CountryOfCitizenship, Ethnicity, ExceptionAnswer, FirearmType, FormType, Race,
    YesNo,
};
pub use controls::{
    CheckGroupControl, CheckboxControl, Control, ControlSet, DateControl, RadioGroupControl,
    TextControl, keys,
};
pub use format::{format_ssn, format_telephone};
pub use token::{TokenError, decode, decode_fragment, encode};
pub use validate::{ValidationFailure, ValidationReport, check_control, validate_controls};
