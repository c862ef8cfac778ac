//! Applies a field mapping to an open template and produces the finished
//! questionnaire bytes.
//!
//! Individual widget problems degrade the output rather than failing it:
//! each one is collected into the [`FillReport`] and the pass moves on.
//! Only opening, flattening and saving the document are fatal.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{DocumentBackend, DocumentError, FieldKind, FormDocument, FormWidget};
use crate::fields::{GEOMETRY_TWEAKS, PDF_MIME, PRUNED_PAGES, cleo_variant};
use crate::mapping::{FieldMapping, FieldOp};

#[derive(Debug, Error)]
pub enum FillError {
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Something that went wrong on the way to the output, without stopping it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FillIssue {
    pub target: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FillReport {
    pub fields_written: usize,
    pub pages_removed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FillIssue>,
}

/// Finished document bytes plus the degradations encountered producing them.
#[derive(Debug)]
pub struct FillOutcome {
    pub bytes: Vec<u8>,
    pub report: FillReport,
}

/// Opens the template through `backend`, checks it really is a PDF, and
/// runs [`fill_and_finalize`] on it.
pub fn generate(
    backend: &dyn DocumentBackend,
    template: &[u8],
    mapping: &FieldMapping,
) -> Result<FillOutcome, FillError> {
    let document = backend.open(template, PDF_MIME)?;
    if !document.is_pdf() {
        return Err(FillError::Document(DocumentError::NotAPdf));
    }
    fill_and_finalize(document, mapping)
}

/// Nudges the drifting widgets, writes every mapped field onto both copies,
/// prunes the instruction pages, flattens and saves. The document is
/// consumed; its handles are released when this returns.
pub fn fill_and_finalize(
    mut document: Box<dyn FormDocument>,
    mapping: &FieldMapping,
) -> Result<FillOutcome, FillError> {
    let mut report = FillReport::default();
    tracing::debug!(fields = mapping.len(), "applying field mapping");

    {
        let mut widgets = collect_widgets(document.as_ref())?;
        apply_geometry(&mut widgets, &mut report);
        apply_ops(&mut widgets, mapping, &mut report);
    }

    prune_pages(document.as_mut(), &mut report);
    document.flatten_forms()?;
    let bytes = document.save()?;
    Ok(FillOutcome { bytes, report })
}

/// Indexes every named widget in the document. Later pages win name
/// collisions, so the CLEO copy owns any name both copies share verbatim.
fn collect_widgets(
    document: &dyn FormDocument,
) -> Result<HashMap<String, Box<dyn FormWidget>>, DocumentError> {
    let mut widgets = HashMap::new();
    for page in 0..document.page_count() {
        for widget in document.widgets_on_page(page)? {
            if let Some(name) = widget.name() {
                widgets.insert(name, widget);
            }
        }
    }
    Ok(widgets)
}

fn apply_geometry(widgets: &mut HashMap<String, Box<dyn FormWidget>>, report: &mut FillReport) {
    for (name, delta) in GEOMETRY_TWEAKS {
        for variant in [name.to_string(), cleo_variant(name)] {
            let Some(widget) = widgets.get_mut(&variant) else {
                continue;
            };
            if let Err(error) = nudge_widget(widget.as_mut(), *delta) {
                report.issues.push(FillIssue {
                    target: variant,
                    detail: error.to_string(),
                });
            }
        }
    }
}

fn nudge_widget(widget: &mut dyn FormWidget, delta: [f32; 4]) -> Result<(), DocumentError> {
    let rect = widget.rect()?;
    widget.set_rect(rect.shifted(delta))?;
    widget.update()
}

fn apply_ops(
    widgets: &mut HashMap<String, Box<dyn FormWidget>>,
    mapping: &FieldMapping,
    report: &mut FillReport,
) {
    for write in mapping.writes() {
        for variant in [write.field.clone(), cleo_variant(&write.field)] {
            let Some(widget) = widgets.get_mut(&variant) else {
                tracing::debug!(field = %variant, "no widget for mapped field");
                continue;
            };
            match apply_op(widget.as_mut(), &write.op) {
                Ok(Applied::Written) => report.fields_written += 1,
                Ok(Applied::Skipped(detail)) => {
                    tracing::warn!(field = %variant, detail, "skipped mapped field");
                    report.issues.push(FillIssue {
                        target: variant,
                        detail,
                    });
                }
                Err(error) => {
                    tracing::warn!(field = %variant, %error, "could not fill field");
                    report.issues.push(FillIssue {
                        target: variant,
                        detail: error.to_string(),
                    });
                }
            }
        }
    }
}

enum Applied {
    Written,
    Skipped(String),
}

/// Applies one operation according to the widget's kind. The appearance is
/// re-rendered even when the operation itself was skipped, matching how
/// untouched widgets still need their appearance streams refreshed before
/// flattening.
fn apply_op(widget: &mut dyn FormWidget, op: &FieldOp) -> Result<Applied, DocumentError> {
    let kind = widget.kind();
    let applied = match op {
        FieldOp::Select => {
            if kind.is_selectable() {
                widget.toggle()?;
                Applied::Written
            } else {
                Applied::Skipped(format!("cannot activate {kind:?} field"))
            }
        }
        FieldOp::SetText { value } | FieldOp::SetChoice { value } => match kind {
            FieldKind::Text => {
                widget.set_text_value(value)?;
                Applied::Written
            }
            FieldKind::Choice => {
                widget.set_choice_value(value)?;
                Applied::Written
            }
            _ => match widget.set_text_value(value) {
                Ok(()) => Applied::Written,
                Err(error) => {
                    Applied::Skipped(format!("text fallback failed on {kind:?} field: {error}"))
                }
            },
        },
    };
    widget.update()?;
    Ok(applied)
}

fn prune_pages(document: &mut dyn FormDocument, report: &mut FillReport) {
    for &page in PRUNED_PAGES {
        match document.delete_page(page) {
            Ok(()) => report.pages_removed += 1,
            Err(error) => {
                tracing::warn!(page, %error, "could not remove instruction page");
                report.issues.push(FillIssue {
                    target: format!("page {page}"),
                    detail: error.to_string(),
                });
            }
        }
    }
}
