//! Geography of the ATF Form 5320.23 template.
//!
//! The blank form carries two copies of the questionnaire: the applicant
//! copy on pages 1-2 and the CLEO (chief law enforcement officer) copy on
//! pages 5-6, with near-identical field names. Every answer is written to
//! both copies; the instruction pages between them are pruned from the
//! output.

/// File name of the blank template, as published by the ATF.
pub const TEMPLATE_FILE: &str =
    "f_5320.23_national_firearms_act_nfa_responsible_person_questionnaire.pdf";

/// MIME type handed to the document backend.
pub const PDF_MIME: &str = "application/pdf";

/// File name offered for the filled questionnaire.
pub const OUTPUT_FILE_NAME: &str = "5320.23.pdf";

/// Zero-based instruction pages removed after filling. Descending order so
/// each removal leaves the remaining index valid.
pub const PRUNED_PAGES: &[usize] = &[3, 2];

/// Maps an applicant-copy field name to its CLEO-copy twin. Names that do
/// not belong to the applicant copy come back unchanged.
pub fn cleo_variant(name: &str) -> String {
    name.replace("Page1[0]", "Page5[0]")
        .replace("Page2[0]", "Page6[0]")
        .replace("#field[24]", "#field[22]")
}

/// Per-edge rectangle nudges `[x0, y0, x1, y1]` for widgets whose printed
/// position drifts from the visible checkbox or line. Applied to both
/// copies before any value is written.
pub const GEOMETRY_TWEAKS: &[(&str, [f32; 4])] = &[
    ("topmostSubform[0].Page2[0].no17[0]", [2.5, 0.0, 2.5, 0.0]),
    ("topmostSubform[0].Page2[0].usacheckbox[0]", [1.5, 0.0, 1.5, 0.0]),
    ("topmostSubform[0].Page1[0].nhl[0]", [1.0, 0.0, 1.0, 0.0]),
    ("topmostSubform[0].Page1[0].w[0]", [1.0, 0.0, 1.0, 0.0]),
    ("topmostSubform[0].Page1[0].#field[24]", [0.0, -0.5, 0.0, 0.5]),
];
