//! Extended element implementations built on top of `genpdf` primitives.
//!
//! This module adds a fixed-height spacer, a wrapper that records the page an
//! element starts on, and helpers that turn flow items into `genpdf` elements.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use genpdf::elements::{Break, LinearLayout, Paragraph};
use genpdf::error::Error;
use genpdf::style::{Style, StyledString};
use genpdf::{render, Element, Mm, RenderResult, Size};

use crate::richtext::Line;
use crate::styles::{self, TextStyle};

/// Vertical whitespace of a fixed height.
///
/// A spacer that does not fit on the current page is shortened to the space
/// that is left instead of being carried over, so gaps never open a page.
pub struct Spacer {
    height: Mm,
}

impl Spacer {
    /// Creates a spacer of the given height.
    pub fn new(height: impl Into<Mm>) -> Self {
        Self {
            height: height.into(),
        }
    }

    /// Creates a spacer whose height is given in points.
    pub fn from_points(points: f64) -> Self {
        Self::new(styles::mm_from_points(points))
    }

    /// Returns the requested height.
    pub fn height(&self) -> Mm {
        self.height
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };

        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// Shared page bookkeeping between the page decorator and [`Marked`] elements.
///
/// The decorator advances the page counter whenever `genpdf` opens a page;
/// marked elements read it when they first put content on a page.
#[derive(Clone, Debug, Default)]
pub struct PageTracker {
    current: Rc<Cell<usize>>,
    starts: Rc<RefCell<Vec<Option<usize>>>>,
}

impl PageTracker {
    /// Creates a tracker with room for `slots` recorded positions.
    pub fn with_slots(slots: usize) -> Self {
        Self {
            current: Rc::new(Cell::new(0)),
            starts: Rc::new(RefCell::new(vec![None; slots])),
        }
    }

    /// Moves to the next page and returns its 1-based number.
    pub fn advance(&self) -> usize {
        let page = self.current.get() + 1;
        self.current.set(page);
        page
    }

    /// Returns the 1-based number of the page being rendered, or 0 before the first page.
    pub fn current_page(&self) -> usize {
        self.current.get()
    }

    fn record(&self, slot: usize) {
        let page = self.current.get();
        let mut starts = self.starts.borrow_mut();
        if let Some(entry) = starts.get_mut(slot) {
            entry.get_or_insert(page);
        }
    }

    /// Returns the recorded start page for every slot.
    pub fn starts(&self) -> Vec<Option<usize>> {
        self.starts.borrow().clone()
    }
}

/// Wraps an element and records the page on which it first renders content.
pub struct Marked<E: Element> {
    inner: E,
    tracker: PageTracker,
    slot: usize,
}

impl<E: Element> Marked<E> {
    /// Wraps `inner`, recording its start page into `slot` of `tracker`.
    pub fn new(inner: E, tracker: PageTracker, slot: usize) -> Self {
        Self {
            inner,
            tracker,
            slot,
        }
    }
}

impl<E: Element> Element for Marked<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let result = self.inner.render(context, area, style)?;
        if result.size.height > Mm::default() {
            self.tracker.record(self.slot);
        }
        Ok(result)
    }
}

/// Builds a single styled paragraph for a title or heading.
pub fn heading_paragraph(text: &str, text_style: &TextStyle) -> Paragraph {
    let mut paragraph = Paragraph::new(StyledString::new(text.to_owned(), text_style.to_style()));
    paragraph.set_alignment(text_style.alignment().into());
    paragraph
}

/// Builds the element for a section body: one paragraph per line.
///
/// Empty lines (consecutive breaks) become a one-line break.
pub fn body_block(lines: &[Line], text_style: &TextStyle) -> LinearLayout {
    let base = text_style.to_style();
    let alignment = text_style.alignment().into();
    let mut layout = LinearLayout::vertical();

    for line in lines {
        if line.is_empty() {
            layout.push(Break::new(1).styled(base));
            continue;
        }

        let mut paragraph = Paragraph::default();
        for span in line {
            paragraph.push(span.to_styled_string());
        }
        paragraph.set_alignment(alignment);
        layout.push(paragraph.styled(base));
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_records_first_page_only() {
        let tracker = PageTracker::with_slots(2);
        tracker.advance();
        tracker.record(1);
        tracker.advance();
        tracker.record(1);
        tracker.record(0);
        assert_eq!(tracker.starts(), vec![Some(2), Some(1)]);
        assert_eq!(tracker.current_page(), 2);
    }

    #[test]
    fn tracker_ignores_unknown_slots() {
        let tracker = PageTracker::with_slots(1);
        tracker.advance();
        tracker.record(5);
        assert_eq!(tracker.starts(), vec![None]);
    }

    #[test]
    fn spacer_converts_points() {
        let spacer = Spacer::from_points(72.0);
        let mm: printpdf::Mm = spacer.height().into();
        assert!((mm.0 - 25.4).abs() < 1e-9);
    }
}
