//! Data structures describing the logical content of the brief.
//!
//! The types in this module carry plain text and inline markup only.  They do
//! not reference the rendering crate so that content can be declared, inspected
//! and tested without loading fonts or laying out pages.

/// One block of the document: a heading followed by its body text.
///
/// The body is stored as inline markup (see [`crate::richtext::parse_markup`])
/// and may be empty.  The heading is rendered as plain text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    heading: String,
    body: String,
}

impl Section {
    /// Creates a section from a heading and its body markup.
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
        }
    }

    /// Creates a section that has a heading but no body text.
    pub fn heading_only(heading: impl Into<String>) -> Self {
        Self::new(heading, String::new())
    }

    /// Returns the heading of the section.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Returns the raw body markup.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns whether the section carries any body text.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

impl<H, B> From<(H, B)> for Section
where
    H: Into<String>,
    B: Into<String>,
{
    fn from((heading, body): (H, B)) -> Self {
        Self::new(heading, body)
    }
}

/// A titled, ordered sequence of sections.
///
/// Section order is preserved exactly; it becomes the order of headings in the
/// rendered document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    title: String,
    sections: Vec<Section>,
}

impl Report {
    /// Creates an empty report with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Returns the document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Appends a section and returns the updated report.
    pub fn with_section(mut self, section: impl Into<Section>) -> Self {
        self.sections.push(section.into());
        self
    }

    /// Extends the report with multiple sections and returns the updated instance.
    pub fn with_sections<I>(mut self, sections: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Section>,
    {
        self.sections.extend(sections.into_iter().map(Into::into));
        self
    }

    /// Returns the section headings in document order.
    pub fn headings(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.iter().map(Section::heading)
    }
}
