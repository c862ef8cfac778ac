#![allow(missing_docs)]

pub mod document;
pub mod fields;
pub mod fill;
pub mod mapping;

pub use document::{DocumentBackend, DocumentError, FieldKind, FormDocument, FormWidget, Rect};
pub use fields::{OUTPUT_FILE_NAME, PDF_MIME, TEMPLATE_FILE, cleo_variant};
pub use fill::{FillError, FillIssue, FillOutcome, FillReport, fill_and_finalize, generate};
pub use mapping::{FieldMapping, FieldOp, FieldWrite, map_record};
