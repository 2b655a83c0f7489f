//! Document construction and output for the `wostup_brief` crate.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use genpdf::elements::Paragraph;
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{self, Style};
use genpdf::{self, Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position, Size};
use log::{debug, info};

use crate::elements::{self, Marked, PageTracker, Spacer};
use crate::error::BuildError;
use crate::flow::{Flow, FlowItem};
use crate::fonts::FontSearch;
use crate::model::Report;
use crate::styles::Stylesheet;

/// Page margin applied on every side, in millimetres (one inch).
pub const DEFAULT_MARGIN_MM: f64 = 25.4;

/// Height reserved for the page-number footer, in millimetres.
const FOOTER_HEIGHT_MM: f64 = 10.0;

/// Bytes of a rendered document together with layout information.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    /// The serialized PDF document.
    pub bytes: Vec<u8>,
    /// 1-based start page of every section heading, in section order.
    pub section_pages: Vec<Option<usize>>,
}

/// Builder that lays out a [`Report`] and renders it to PDF.
///
/// The builder owns the content and the layout configuration.  Rendering is a
/// single all-or-nothing step; [`PdfBuilder::write_to`] additionally stores the
/// bytes on disk without ever leaving a partial file at the target path.
pub struct PdfBuilder {
    report: Report,
    stylesheet: Stylesheet,
    paper_size: Size,
    margins: Margins,
    page_numbers: bool,
    fonts_dir: Option<PathBuf>,
    #[cfg(feature = "bookmarks")]
    bookmarks: bool,
}

impl PdfBuilder {
    /// Creates a builder for `report` with A4 paper, one-inch margins and the default stylesheet.
    pub fn new(report: Report) -> Self {
        Self {
            report,
            stylesheet: Stylesheet::default(),
            paper_size: PaperSize::A4.into(),
            margins: Margins::all(DEFAULT_MARGIN_MM),
            page_numbers: false,
            fonts_dir: None,
            #[cfg(feature = "bookmarks")]
            bookmarks: true,
        }
    }

    /// Replaces the stylesheet.
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Sets the paper size used for the document.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = margins.into();
        self
    }

    /// Enables or disables a centered `Page N` footer.
    pub fn with_page_numbers(mut self, page_numbers: bool) -> Self {
        self.page_numbers = page_numbers;
        self
    }

    /// Searches `directory` for fonts before the standard locations.
    pub fn with_fonts_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.fonts_dir = Some(directory.into());
        self
    }

    /// Enables or disables the section outline in the rendered PDF.
    #[cfg(feature = "bookmarks")]
    pub fn with_bookmarks(mut self, bookmarks: bool) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    /// Assembles the document flow without rendering it.
    pub fn flow(&self) -> Result<Flow, BuildError> {
        Flow::assemble(&self.report, &self.stylesheet)
    }

    /// Lays out and renders the document to bytes.
    pub fn render(self) -> Result<RenderedPdf, BuildError> {
        let search = FontSearch::standard(self.fonts_dir.as_deref());
        self.render_with(&search)
    }

    fn render_with(self, search: &FontSearch) -> Result<RenderedPdf, BuildError> {
        let flow = self.flow()?;

        let font_family = search.load().map_err(BuildError::FontLoad)?;
        let mut document = genpdf::Document::new(font_family);
        document.set_title(self.report.title().trim());
        document.set_paper_size(self.paper_size);

        let tracker = PageTracker::with_slots(self.report.sections().len());
        document.set_page_decorator(BriefPageDecorator::new(
            self.margins,
            self.page_numbers,
            tracker.clone(),
        ));

        push_flow(&mut document, flow, &self.stylesheet, &tracker);

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(BuildError::Render)?;
        let section_pages = tracker.starts();
        info!(
            "Rendered '{}' ({} bytes, {} pages)",
            self.report.title(),
            bytes.len(),
            tracker.current_page()
        );

        #[cfg(feature = "bookmarks")]
        let bytes = if self.bookmarks {
            crate::bookmarks::apply_section_bookmarks(
                &bytes,
                self.report.sections(),
                &section_pages,
            )?
        } else {
            bytes
        };

        Ok(RenderedPdf {
            bytes,
            section_pages,
        })
    }

    /// Renders the document and writes it to `path`, replacing any existing file.
    ///
    /// The bytes are written to a staging file next to `path` and renamed into
    /// place, so the target is either the complete new document or untouched.
    pub fn write_to(self, path: impl AsRef<Path>) -> Result<RenderedPdf, BuildError> {
        let path = path.as_ref();
        let rendered = self.render()?;
        write_atomically(path, &rendered.bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), rendered.bytes.len());
        Ok(rendered)
    }
}

fn push_flow(
    document: &mut genpdf::Document,
    flow: Flow,
    stylesheet: &Stylesheet,
    tracker: &PageTracker,
) {
    for item in flow.into_items() {
        match item {
            FlowItem::Title(text) => {
                document.push(elements::heading_paragraph(&text, stylesheet.title()));
            }
            FlowItem::Spacer(points) => document.push(Spacer::from_points(points)),
            FlowItem::Heading {
                section_index,
                text,
            } => document.push(Marked::new(
                elements::heading_paragraph(&text, stylesheet.heading()),
                tracker.clone(),
                section_index,
            )),
            FlowItem::Body { lines, .. } => {
                if !lines.is_empty() {
                    document.push(elements::body_block(&lines, stylesheet.body()));
                }
            }
        }
    }
}

fn staging_path(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?;
    let mut staging = OsString::from(".");
    staging.push(file_name);
    staging.push(".partial");
    Some(path.with_file_name(staging))
}

/// Writes `bytes` to `path` through a sibling staging file.
///
/// On failure the staging file is removed and `path` is left as it was.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    let staging = staging_path(path).ok_or_else(|| BuildError::InvalidOutputPath {
        path: path.to_path_buf(),
    })?;
    debug!("Staging output at {}", staging.display());

    let result = fs::write(&staging, bytes).and_then(|()| fs::rename(&staging, path));
    result.map_err(|source| {
        let _ = fs::remove_file(&staging);
        BuildError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

struct BriefPageDecorator {
    margins: Margins,
    page_numbers: bool,
    tracker: PageTracker,
}

impl BriefPageDecorator {
    fn new(margins: Margins, page_numbers: bool, tracker: PageTracker) -> Self {
        Self {
            margins,
            page_numbers,
            tracker,
        }
    }
}

impl PageDecorator for BriefPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.tracker.advance();
        area.add_margins(self.margins);

        if self.page_numbers {
            let footer_height = Mm::from(FOOTER_HEIGHT_MM);
            let available = area.size().height;
            if footer_height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer_height));
            let mut footer = Paragraph::new(format!("Page {}", page)).aligned(Alignment::Center);
            let footer_style = Style::new().with_font_size(8);
            let result = footer.render(context, footer_area, style.and(footer_style))?;
            if result.has_more {
                return Err(Error::new(
                    "Footer element does not fit into the reserved space",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer_height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_file_is_a_hidden_sibling() {
        let staging = staging_path(Path::new("out/brief.pdf")).expect("staging path");
        assert_eq!(staging, PathBuf::from("out/.brief.pdf.partial"));
    }

    #[test]
    fn root_path_is_not_a_file() {
        let err = write_atomically(Path::new("/"), b"%PDF").unwrap_err();
        assert!(matches!(err, BuildError::InvalidOutputPath { .. }));
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("brief.pdf");
        fs::write(&target, b"old").expect("seed");

        write_atomically(&target, b"%PDF-new").expect("write succeeds");

        assert_eq!(fs::read(&target).expect("read"), b"%PDF-new");
        assert!(!dir.path().join(".brief.pdf.partial").exists());
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("missing").join("brief.pdf");

        let err = write_atomically(&target, b"%PDF").unwrap_err();

        assert!(matches!(err, BuildError::Write { .. }));
        assert!(!target.exists());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn rename_onto_directory_keeps_directory_and_cleans_staging() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("brief.pdf");
        fs::create_dir(&target).expect("directory in the way");

        let err = write_atomically(&target, b"%PDF").unwrap_err();

        assert!(matches!(err, BuildError::Write { .. }));
        assert!(target.is_dir());
        assert!(!dir.path().join(".brief.pdf.partial").exists());
    }

    #[test]
    fn missing_fonts_are_a_font_load_error() {
        let empty = tempfile::tempdir().expect("tempdir");
        let search = FontSearch::only(Some(empty.path().to_path_buf()), Vec::new());
        let report = Report::new("Brief").with_section(("Only", "body"));

        let err = PdfBuilder::new(report).render_with(&search).unwrap_err();

        let BuildError::FontLoad(source) = &err else {
            panic!("expected a font load error, got {err}");
        };
        assert!(source.to_string().contains("Unable to locate a font family"));
        assert!(err
            .to_string()
            .contains(&empty.path().display().to_string()));
    }

    #[test]
    fn invalid_content_fails_before_fonts_are_loaded() {
        let err = PdfBuilder::new(Report::new(""))
            .with_fonts_dir("/__wostup_brief_missing_fonts__")
            .render()
            .unwrap_err();
        assert!(matches!(err, BuildError::EmptyTitle));
    }
}
