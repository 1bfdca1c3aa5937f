//! Report persistence.
//!
//! A finished report is written twice: the markdown verbatim, and a PDF
//! rendered from it. Both land in the reports directory under the suggested
//! file name stem.

use std::path::{Path, PathBuf};

use genpdf::elements::{Break, Paragraph};
use genpdf::{Document, SimplePageDecorator};
use serde::Serialize;

use crate::error::PersistenceError;

/// Paths produced by a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SavedReport {
    pub markdown_path: PathBuf,
    pub pdf_path: PathBuf,
}

/// Persists finished reports.
pub trait ReportStore: Send + Sync {
    /// Save the report under the given file name stem, returning where both
    /// renditions landed.
    fn save(&self, content: &str, stem: &str) -> Result<SavedReport, PersistenceError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Filesystem Store
// ─────────────────────────────────────────────────────────────────────────────

/// Stores reports on the local filesystem.
pub struct FsReportStore {
    dir: PathBuf,
}

impl FsReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The default reports directory, relative to the working directory.
    pub fn default_dir() -> PathBuf {
        PathBuf::from("reports")
    }
}

impl ReportStore for FsReportStore {
    fn save(&self, content: &str, stem: &str) -> Result<SavedReport, PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;

        let markdown_path = self.dir.join(format!("{stem}.md"));
        std::fs::write(&markdown_path, content)?;

        let pdf_path = self.dir.join(format!("{stem}.pdf"));
        render_pdf(content, stem, &pdf_path)?;

        tracing::debug!(
            markdown = %markdown_path.display(),
            pdf = %pdf_path.display(),
            "Report saved"
        );
        Ok(SavedReport {
            markdown_path,
            pdf_path,
        })
    }
}

/// Load a usable font family, trying common system locations in order.
fn load_font_family() -> Result<genpdf::fonts::FontFamily<genpdf::fonts::FontData>, PersistenceError>
{
    let candidates = [
        ("/usr/share/fonts/truetype/liberation", "LiberationSans"),
        ("/usr/share/fonts/liberation-sans", "LiberationSans"),
        ("/usr/share/fonts/truetype/dejavu", "DejaVuSans"),
        ("/System/Library/Fonts", "Helvetica"),
        ("/Library/Fonts", "Arial"),
    ];

    for (dir, name) in candidates {
        if let Ok(family) = genpdf::fonts::from_files(dir, name, None) {
            return Ok(family);
        }
    }
    Err(PersistenceError::Render(
        "no usable font family found for PDF rendering".to_string(),
    ))
}

fn render_pdf(content: &str, title: &str, path: &Path) -> Result<(), PersistenceError> {
    let font_family = load_font_family()?;

    let mut doc = Document::new(font_family);
    doc.set_title(title);

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(30);
    doc.set_page_decorator(decorator);

    let title_style = genpdf::style::Style::new().bold().with_font_size(18);
    doc.push(Paragraph::new(genpdf::style::StyledString::new(
        title.replace('_', " "),
        title_style,
    )));
    doc.push(Break::new(1));

    for paragraph in content.split("\n\n") {
        let trimmed = paragraph.trim();
        if !trimmed.is_empty() {
            doc.push(Paragraph::new(trimmed));
            doc.push(Break::new(0.5));
        }
    }

    doc.render_to_file(path)
        .map_err(|e| PersistenceError::Render(format!("Failed to render PDF: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Store
// ─────────────────────────────────────────────────────────────────────────────

/// An in-memory store for tests. Records every save; can be scripted to fail.
#[derive(Default)]
pub struct MockReportStore {
    saves: std::sync::Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl MockReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every save fails.
    pub fn failing() -> Self {
        Self {
            saves: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// All `(content, stem)` pairs saved so far.
    pub fn saves(&self) -> Vec<(String, String)> {
        self.saves.lock().unwrap().clone()
    }
}

impl ReportStore for MockReportStore {
    fn save(&self, content: &str, stem: &str) -> Result<SavedReport, PersistenceError> {
        if self.fail {
            return Err(PersistenceError::Render(
                "MockReportStore: scripted failure".to_string(),
            ));
        }
        self.saves
            .lock()
            .unwrap()
            .push((content.to_string(), stem.to_string()));
        Ok(SavedReport {
            markdown_path: PathBuf::from(format!("{stem}.md")),
            pdf_path: PathBuf::from(format!("{stem}.pdf")),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
