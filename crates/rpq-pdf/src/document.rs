//! Backend-neutral view of a fillable PDF document.
//!
//! The fill pipeline only needs a handful of operations on documents and
//! their form widgets; backends (mupdf in the browser build, anything
//! test-shaped elsewhere) implement these traits. Dropping a
//! [`FormDocument`] releases whatever native handles the backend holds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not open document: {0}")]
    Open(String),
    #[error("document is not a PDF")]
    NotAPdf,
    #[error("page {0} is out of range")]
    PageOutOfRange(usize),
    #[error("widget operation failed: {0}")]
    Widget(String),
    #[error("could not save document: {0}")]
    Save(String),
}

/// Form field kinds a backend can report. Unknown covers anything the
/// backend cannot classify; writes to such fields fall back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Choice,
    Checkbox,
    RadioButton,
    Button,
    Signature,
    Unknown,
}

impl FieldKind {
    /// Whether an activation (toggle) is meaningful for this kind.
    pub fn is_selectable(self) -> bool {
        matches!(self, FieldKind::Checkbox | FieldKind::RadioButton)
    }
}

/// Widget bounds in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    /// Returns the rectangle moved by per-edge deltas `[x0, y0, x1, y1]`.
    pub fn shifted(self, delta: [f32; 4]) -> Rect {
        Rect {
            x0: self.x0 + delta[0],
            y0: self.y0 + delta[1],
            x1: self.x1 + delta[2],
            y1: self.y1 + delta[3],
        }
    }
}

/// One interactive form widget on a page.
pub trait FormWidget {
    /// Fully qualified field name, when the widget has one.
    fn name(&self) -> Option<String>;
    fn kind(&self) -> FieldKind;
    fn rect(&self) -> Result<Rect, DocumentError>;
    fn set_rect(&mut self, rect: Rect) -> Result<(), DocumentError>;
    fn set_text_value(&mut self, value: &str) -> Result<(), DocumentError>;
    fn set_choice_value(&mut self, value: &str) -> Result<(), DocumentError>;
    /// Flips a checkbox or radio button to its other state.
    fn toggle(&mut self) -> Result<(), DocumentError>;
    /// Re-renders the widget appearance after a change.
    fn update(&mut self) -> Result<(), DocumentError>;
}

/// An open document with form fields.
pub trait FormDocument {
    fn is_pdf(&self) -> bool;
    fn page_count(&self) -> usize;
    fn widgets_on_page(&self, page: usize) -> Result<Vec<Box<dyn FormWidget>>, DocumentError>;
    fn delete_page(&mut self, page: usize) -> Result<(), DocumentError>;
    /// Bakes current field appearances into page content and drops the
    /// interactive fields.
    fn flatten_forms(&mut self) -> Result<(), DocumentError>;
    fn save(&mut self) -> Result<Vec<u8>, DocumentError>;
}

/// Opens documents from bytes.
pub trait DocumentBackend {
    fn open(&self, bytes: &[u8], mime: &str) -> Result<Box<dyn FormDocument>, DocumentError>;
}
