use std::cell::RefCell;
use std::rc::Rc;

use rpq_pdf::{
    DocumentBackend, DocumentError, FieldKind, FieldMapping, FieldOp, FillError, FormDocument,
    FormWidget, PDF_MIME, Rect, fill_and_finalize, generate,
};

#[derive(Debug)]
struct WidgetState {
    name: Option<String>,
    kind: FieldKind,
    rect: Rect,
    text: Option<String>,
    choice: Option<String>,
    toggles: usize,
    updates: usize,
    reject_text: bool,
    reject_rect: bool,
}

fn widget(name: &str, kind: FieldKind) -> Rc<RefCell<WidgetState>> {
    Rc::new(RefCell::new(WidgetState {
        name: Some(name.to_string()),
        kind,
        rect: Rect {
            x0: 10.0,
            y0: 20.0,
            x1: 30.0,
            y1: 40.0,
        },
        text: None,
        choice: None,
        toggles: 0,
        updates: 0,
        reject_text: false,
        reject_rect: false,
    }))
}

struct FakeWidget {
    state: Rc<RefCell<WidgetState>>,
}

impl FormWidget for FakeWidget {
    fn name(&self) -> Option<String> {
        self.state.borrow().name.clone()
    }

    fn kind(&self) -> FieldKind {
        self.state.borrow().kind
    }

    fn rect(&self) -> Result<Rect, DocumentError> {
        let state = self.state.borrow();
        if state.reject_rect {
            return Err(DocumentError::Widget("no visible rectangle".into()));
        }
        Ok(state.rect)
    }

    fn set_rect(&mut self, rect: Rect) -> Result<(), DocumentError> {
        self.state.borrow_mut().rect = rect;
        Ok(())
    }

    fn set_text_value(&mut self, value: &str) -> Result<(), DocumentError> {
        let mut state = self.state.borrow_mut();
        if state.reject_text {
            return Err(DocumentError::Widget("value rejected".into()));
        }
        state.text = Some(value.to_string());
        Ok(())
    }

    fn set_choice_value(&mut self, value: &str) -> Result<(), DocumentError> {
        self.state.borrow_mut().choice = Some(value.to_string());
        Ok(())
    }

    fn toggle(&mut self) -> Result<(), DocumentError> {
        self.state.borrow_mut().toggles += 1;
        Ok(())
    }

    fn update(&mut self) -> Result<(), DocumentError> {
        self.state.borrow_mut().updates += 1;
        Ok(())
    }
}

struct DocState {
    pdf: bool,
    pages: Vec<Vec<Rc<RefCell<WidgetState>>>>,
    deleted: Vec<usize>,
    locked_pages: Vec<usize>,
    flattened: bool,
}

fn six_pages() -> Vec<Vec<Rc<RefCell<WidgetState>>>> {
    vec![Vec::new(); 6]
}

fn document_with(pages: Vec<Vec<Rc<RefCell<WidgetState>>>>) -> Rc<RefCell<DocState>> {
    Rc::new(RefCell::new(DocState {
        pdf: true,
        pages,
        deleted: Vec::new(),
        locked_pages: Vec::new(),
        flattened: false,
    }))
}

struct FakeDocument {
    doc: Rc<RefCell<DocState>>,
}

impl FormDocument for FakeDocument {
    fn is_pdf(&self) -> bool {
        self.doc.borrow().pdf
    }

    fn page_count(&self) -> usize {
        self.doc.borrow().pages.len()
    }

    fn widgets_on_page(&self, page: usize) -> Result<Vec<Box<dyn FormWidget>>, DocumentError> {
        let doc = self.doc.borrow();
        let on_page = doc
            .pages
            .get(page)
            .ok_or(DocumentError::PageOutOfRange(page))?;
        Ok(on_page
            .iter()
            .map(|state| {
                Box::new(FakeWidget {
                    state: Rc::clone(state),
                }) as Box<dyn FormWidget>
            })
            .collect())
    }

    fn delete_page(&mut self, page: usize) -> Result<(), DocumentError> {
        let mut doc = self.doc.borrow_mut();
        if doc.locked_pages.contains(&page) {
            return Err(DocumentError::PageOutOfRange(page));
        }
        doc.deleted.push(page);
        Ok(())
    }

    fn flatten_forms(&mut self) -> Result<(), DocumentError> {
        self.doc.borrow_mut().flattened = true;
        Ok(())
    }

    fn save(&mut self) -> Result<Vec<u8>, DocumentError> {
        Ok(b"%PDF-finished".to_vec())
    }
}

struct FakeBackend {
    doc: Rc<RefCell<DocState>>,
    opened_mimes: Rc<RefCell<Vec<String>>>,
}

impl DocumentBackend for FakeBackend {
    fn open(&self, bytes: &[u8], mime: &str) -> Result<Box<dyn FormDocument>, DocumentError> {
        if bytes.is_empty() {
            return Err(DocumentError::Open("empty input".into()));
        }
        self.opened_mimes.borrow_mut().push(mime.to_string());
        Ok(Box::new(FakeDocument {
            doc: Rc::clone(&self.doc),
        }))
    }
}

fn run(doc: &Rc<RefCell<DocState>>, mapping: &FieldMapping) -> rpq_pdf::FillOutcome {
    fill_and_finalize(
        Box::new(FakeDocument {
            doc: Rc::clone(doc),
        }),
        mapping,
    )
    .expect("fill must finish")
}

#[test]
fn mapped_text_lands_on_both_copies() {
    let applicant = widget("topmostSubform[0].Page1[0].Model[0]", FieldKind::Text);
    let cleo = widget("topmostSubform[0].Page5[0].Model[0]", FieldKind::Text);
    let mut pages = six_pages();
    pages[0].push(Rc::clone(&applicant));
    pages[4].push(Rc::clone(&cleo));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set("topmostSubform[0].Page1[0].Model[0]", FieldOp::text("M1"));
    let outcome = run(&doc, &mapping);

    assert_eq!(applicant.borrow().text.as_deref(), Some("M1"));
    assert_eq!(cleo.borrow().text.as_deref(), Some("M1"));
    assert_eq!(applicant.borrow().updates, 1);
    assert_eq!(cleo.borrow().updates, 1);
    assert_eq!(outcome.report.fields_written, 2);
    assert!(outcome.report.issues.is_empty());
    assert_eq!(outcome.bytes, b"%PDF-finished");
}

#[test]
fn select_toggles_checkboxes_on_both_copies() {
    let applicant = widget("topmostSubform[0].Page2[0].CheckBoxno6a[0]", FieldKind::Checkbox);
    let cleo = widget("topmostSubform[0].Page6[0].CheckBoxno6a[0]", FieldKind::Checkbox);
    let mut pages = six_pages();
    pages[1].push(Rc::clone(&applicant));
    pages[5].push(Rc::clone(&cleo));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set("topmostSubform[0].Page2[0].CheckBoxno6a[0]", FieldOp::Select);
    let outcome = run(&doc, &mapping);

    assert_eq!(applicant.borrow().toggles, 1);
    assert_eq!(cleo.borrow().toggles, 1);
    assert_eq!(outcome.report.fields_written, 2);
}

#[test]
fn select_on_a_text_widget_is_skipped_but_still_refreshed() {
    let target = widget("topmostSubform[0].Page1[0].form4[0]", FieldKind::Text);
    let mut pages = six_pages();
    pages[0].push(Rc::clone(&target));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set("topmostSubform[0].Page1[0].form4[0]", FieldOp::Select);
    let outcome = run(&doc, &mapping);

    assert_eq!(target.borrow().toggles, 0);
    assert_eq!(target.borrow().text, None);
    assert_eq!(target.borrow().updates, 1);
    assert_eq!(outcome.report.fields_written, 0);
    assert_eq!(outcome.report.issues.len(), 1);
    assert_eq!(
        outcome.report.issues[0].target,
        "topmostSubform[0].Page1[0].form4[0]"
    );
    assert!(outcome.report.issues[0].detail.contains("cannot activate"));
}

#[test]
fn choice_widgets_take_the_choice_path() {
    let target = widget("topmostSubform[0].Page1[0].firearmtype[0]", FieldKind::Choice);
    let mut pages = six_pages();
    pages[0].push(Rc::clone(&target));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set(
        "topmostSubform[0].Page1[0].firearmtype[0]",
        FieldOp::text("SILENCER"),
    );
    let outcome = run(&doc, &mapping);

    assert_eq!(target.borrow().choice.as_deref(), Some("SILENCER"));
    assert_eq!(target.borrow().text, None);
    assert_eq!(outcome.report.fields_written, 1);
}

#[test]
fn unclassified_widgets_fall_back_to_text() {
    let target = widget("topmostSubform[0].Page2[0].DateField9[0]", FieldKind::Unknown);
    let mut pages = six_pages();
    pages[1].push(Rc::clone(&target));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set(
        "topmostSubform[0].Page2[0].DateField9[0]",
        FieldOp::text("03/05/2024"),
    );
    let outcome = run(&doc, &mapping);

    assert_eq!(target.borrow().text.as_deref(), Some("03/05/2024"));
    assert_eq!(outcome.report.fields_written, 1);
}

#[test]
fn failed_text_fallback_becomes_an_issue() {
    let target = widget("topmostSubform[0].Page2[0].DateField9[0]", FieldKind::Signature);
    target.borrow_mut().reject_text = true;
    let mut pages = six_pages();
    pages[1].push(Rc::clone(&target));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set(
        "topmostSubform[0].Page2[0].DateField9[0]",
        FieldOp::text("03/05/2024"),
    );
    let outcome = run(&doc, &mapping);

    assert_eq!(outcome.report.fields_written, 0);
    assert_eq!(outcome.report.issues.len(), 1);
    assert!(outcome.report.issues[0].detail.contains("text fallback failed"));
    assert_eq!(target.borrow().updates, 1);
    assert_eq!(outcome.bytes, b"%PDF-finished");
}

#[test]
fn writes_without_a_widget_are_silently_dropped() {
    let unnamed = widget("", FieldKind::Text);
    unnamed.borrow_mut().name = None;
    let mut pages = six_pages();
    pages[0].push(Rc::clone(&unnamed));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set("topmostSubform[0].Page1[0].email[0]", FieldOp::text("A@B.C"));
    let outcome = run(&doc, &mapping);

    assert_eq!(outcome.report.fields_written, 0);
    assert!(outcome.report.issues.is_empty());
    assert_eq!(unnamed.borrow().updates, 0);
}

#[test]
fn drifting_widgets_are_nudged_on_both_copies() {
    let applicant = widget("topmostSubform[0].Page2[0].no17[0]", FieldKind::Checkbox);
    let cleo = widget("topmostSubform[0].Page6[0].no17[0]", FieldKind::Checkbox);
    let dob = widget("topmostSubform[0].Page1[0].#field[24]", FieldKind::Unknown);
    let mut pages = six_pages();
    pages[1].push(Rc::clone(&applicant));
    pages[5].push(Rc::clone(&cleo));
    pages[0].push(Rc::clone(&dob));
    let doc = document_with(pages);

    let outcome = run(&doc, &FieldMapping::default());

    let nudged = Rect {
        x0: 12.5,
        y0: 20.0,
        x1: 32.5,
        y1: 40.0,
    };
    assert_eq!(applicant.borrow().rect, nudged);
    assert_eq!(cleo.borrow().rect, nudged);
    assert_eq!(
        dob.borrow().rect,
        Rect {
            x0: 10.0,
            y0: 19.5,
            x1: 30.0,
            y1: 40.5,
        }
    );
    assert_eq!(applicant.borrow().updates, 1);
    assert!(outcome.report.issues.is_empty());
}

#[test]
fn geometry_failures_degrade_instead_of_stopping() {
    let target = widget("topmostSubform[0].Page1[0].nhl[0]", FieldKind::Checkbox);
    target.borrow_mut().reject_rect = true;
    let mut pages = six_pages();
    pages[0].push(Rc::clone(&target));
    let doc = document_with(pages);

    let outcome = run(&doc, &FieldMapping::default());

    assert_eq!(outcome.report.issues.len(), 1);
    assert_eq!(
        outcome.report.issues[0].target,
        "topmostSubform[0].Page1[0].nhl[0]"
    );
    assert_eq!(outcome.bytes, b"%PDF-finished");
}

#[test]
fn instruction_pages_are_removed_highest_first() {
    let doc = document_with(six_pages());
    let outcome = run(&doc, &FieldMapping::default());

    assert_eq!(doc.borrow().deleted, vec![3, 2]);
    assert_eq!(outcome.report.pages_removed, 2);
    assert!(doc.borrow().flattened);
}

#[test]
fn a_stuck_page_still_lets_the_other_go() {
    let doc = document_with(six_pages());
    doc.borrow_mut().locked_pages = vec![3];
    let outcome = run(&doc, &FieldMapping::default());

    assert_eq!(doc.borrow().deleted, vec![2]);
    assert_eq!(outcome.report.pages_removed, 1);
    assert_eq!(outcome.report.issues.len(), 1);
    assert_eq!(outcome.report.issues[0].target, "page 3");
    assert_eq!(outcome.bytes, b"%PDF-finished");
}

#[test]
fn colliding_names_resolve_to_the_later_page() {
    let early = widget("topmostSubform[0].Page6[0].DateField9[0]", FieldKind::Text);
    let late = widget("topmostSubform[0].Page6[0].DateField9[0]", FieldKind::Text);
    let mut pages = six_pages();
    pages[4].push(Rc::clone(&early));
    pages[5].push(Rc::clone(&late));
    let doc = document_with(pages);

    let mut mapping = FieldMapping::default();
    mapping.set(
        "topmostSubform[0].Page2[0].DateField9[0]",
        FieldOp::text("03/05/2024"),
    );
    let outcome = run(&doc, &mapping);

    assert_eq!(late.borrow().text.as_deref(), Some("03/05/2024"));
    assert_eq!(early.borrow().text, None);
    assert_eq!(outcome.report.fields_written, 1);
}

#[test]
fn generate_opens_with_the_pdf_mime() {
    let doc = document_with(six_pages());
    let opened_mimes = Rc::new(RefCell::new(Vec::new()));
    let backend = FakeBackend {
        doc: Rc::clone(&doc),
        opened_mimes: Rc::clone(&opened_mimes),
    };

    let outcome =
        generate(&backend, b"%PDF-template", &FieldMapping::default()).expect("fill must finish");

    assert_eq!(*opened_mimes.borrow(), vec![PDF_MIME.to_string()]);
    assert_eq!(outcome.bytes, b"%PDF-finished");
}

#[test]
fn generate_rejects_documents_that_are_not_pdfs() {
    let doc = document_with(six_pages());
    doc.borrow_mut().pdf = false;
    let backend = FakeBackend {
        doc: Rc::clone(&doc),
        opened_mimes: Rc::new(RefCell::new(Vec::new())),
    };

    let error = generate(&backend, b"GIF89a", &FieldMapping::default())
        .expect_err("non-pdf input must be rejected");
    assert!(matches!(
        error,
        FillError::Document(DocumentError::NotAPdf)
    ));
    assert!(!doc.borrow().flattened);
}
