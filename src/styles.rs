//! Typography presets for the title, headings and body text.

use genpdf::style::Style;
use genpdf::{Alignment, Mm};

/// Number of millimetres in one PostScript point.
pub const MM_PER_POINT: f64 = 25.4 / 72.0;

/// Converts a length in points into a `genpdf` length.
pub fn mm_from_points(points: f64) -> Mm {
    Mm::from(printpdf::Mm(points * MM_PER_POINT))
}

/// Horizontal alignment of a text block.
///
/// The variants map directly to [`genpdf::Alignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

impl From<HorizontalAlignment> for Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Alignment::Left,
            HorizontalAlignment::Center => Alignment::Center,
            HorizontalAlignment::Right => Alignment::Right,
        }
    }
}

/// Font settings for one kind of text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    font_size: u8,
    bold: bool,
    italic: bool,
    line_spacing: f64,
    alignment: HorizontalAlignment,
    space_before_pt: f64,
    space_after_pt: f64,
}

impl TextStyle {
    /// Creates a regular, left-aligned style with the given font size in points.
    pub fn new(font_size: u8) -> Self {
        Self {
            font_size,
            bold: false,
            italic: false,
            line_spacing: 1.0,
            alignment: HorizontalAlignment::Left,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
        }
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Returns whether the block is set in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the block is set in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the line spacing factor.
    pub fn line_spacing(&self) -> f64 {
        self.line_spacing
    }

    /// Returns the horizontal alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Space the block asks for above itself, in points.
    pub fn space_before_pt(&self) -> f64 {
        self.space_before_pt
    }

    /// Space the block asks for below itself, in points.
    pub fn space_after_pt(&self) -> f64 {
        self.space_after_pt
    }

    /// Sets the bold flag and returns the updated style.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic flag and returns the updated style.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Sets the line spacing factor and returns the updated style.
    pub fn with_line_spacing(mut self, line_spacing: f64) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    /// Sets the alignment and returns the updated style.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the line spacing so that lines advance by `leading_pt` points.
    pub fn with_leading(self, leading_pt: f64) -> Self {
        let font_size = f64::from(self.font_size.max(1));
        self.with_line_spacing(leading_pt / font_size)
    }

    /// Sets the paragraph spacing above and below the block, in points.
    pub fn with_spacing(mut self, space_before_pt: f64, space_after_pt: f64) -> Self {
        self.space_before_pt = space_before_pt;
        self.space_after_pt = space_after_pt;
        self
    }

    /// Builds the `genpdf` style applied to the whole block.
    pub fn to_style(&self) -> Style {
        let mut style = Style::new()
            .with_font_size(self.font_size)
            .with_line_spacing(self.line_spacing);
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }
}

/// The set of styles and vertical gaps used to lay out a report.
///
/// Defaults follow the classic sample stylesheet: an 18 pt centered bold title
/// on 22 pt leading, 14 pt bold headings on 18 pt leading with 12 pt above and
/// 6 pt below, and 10 pt body text on 12 pt leading with 6 pt above.  The gaps
/// are the explicit spacers placed between blocks; the flow adds each block's
/// own spacing on top of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Stylesheet {
    title: TextStyle,
    heading: TextStyle,
    body: TextStyle,
    title_gap_pt: f64,
    section_gap_pt: f64,
    heading_gap_pt: f64,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            title: TextStyle::new(18)
                .with_bold(true)
                .with_alignment(HorizontalAlignment::Center)
                .with_leading(22.0)
                .with_spacing(0.0, 6.0),
            heading: TextStyle::new(14)
                .with_bold(true)
                .with_leading(18.0)
                .with_spacing(12.0, 6.0),
            body: TextStyle::new(10).with_leading(12.0).with_spacing(6.0, 0.0),
            title_gap_pt: 16.0,
            section_gap_pt: 12.0,
            heading_gap_pt: 6.0,
        }
    }
}

impl Stylesheet {
    /// Style of the document title.
    pub fn title(&self) -> &TextStyle {
        &self.title
    }

    /// Style of section headings.
    pub fn heading(&self) -> &TextStyle {
        &self.heading
    }

    /// Style of section bodies.
    pub fn body(&self) -> &TextStyle {
        &self.body
    }

    /// Total space between the title and the first heading, in points.
    pub fn after_title_pt(&self) -> f64 {
        self.title.space_after_pt + self.title_gap_pt
    }

    /// Total space above every section heading, in points.
    pub fn before_heading_pt(&self) -> f64 {
        self.section_gap_pt + self.heading.space_before_pt
    }

    /// Total space between a heading and its body, in points.
    pub fn after_heading_pt(&self) -> f64 {
        self.heading.space_after_pt + self.heading_gap_pt + self.body.space_before_pt
    }

    /// Gap after the title, in points.
    pub fn title_gap_pt(&self) -> f64 {
        self.title_gap_pt
    }

    /// Gap before every section heading, in points.
    pub fn section_gap_pt(&self) -> f64 {
        self.section_gap_pt
    }

    /// Gap between a heading and its body, in points.
    pub fn heading_gap_pt(&self) -> f64 {
        self.heading_gap_pt
    }

    /// Replaces the title style.
    pub fn with_title(mut self, title: TextStyle) -> Self {
        self.title = title;
        self
    }

    /// Replaces the heading style.
    pub fn with_heading(mut self, heading: TextStyle) -> Self {
        self.heading = heading;
        self
    }

    /// Replaces the body style.
    pub fn with_body(mut self, body: TextStyle) -> Self {
        self.body = body;
        self
    }

    /// Sets the three vertical gaps (after title, before heading, after heading) in points.
    pub fn with_gaps(mut self, title_gap_pt: f64, section_gap_pt: f64, heading_gap_pt: f64) -> Self {
        self.title_gap_pt = title_gap_pt;
        self.section_gap_pt = section_gap_pt;
        self.heading_gap_pt = heading_gap_pt;
        self
    }
}
