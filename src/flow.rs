//! Assembly of a [`Report`] into the ordered flow handed to the layout engine.
//!
//! The flow is plain data: titles, headings, parsed body lines and spacers in
//! document order.  Keeping it separate from the `genpdf` element tree lets the
//! structure of a document be checked without fonts.

use log::debug;

use crate::error::BuildError;
use crate::model::Report;
use crate::richtext::{self, Line};
use crate::styles::Stylesheet;

/// One item of the document flow.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowItem {
    /// The centered document title.
    Title(String),
    /// Vertical whitespace, in points.
    Spacer(f64),
    /// A section heading.
    Heading {
        /// Zero-based position of the section in the report.
        section_index: usize,
        /// The heading text.
        text: String,
    },
    /// The parsed body of a section, one entry per line.
    Body {
        /// Zero-based position of the section in the report.
        section_index: usize,
        /// Lines of styled spans.
        lines: Vec<Line>,
    },
}

/// The ordered list of flow items for one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flow {
    items: Vec<FlowItem>,
}

impl Flow {
    /// Builds the flow for `report` using the spacing configured in `stylesheet`.
    ///
    /// The title comes first, followed by the space after the title.  Every
    /// section then contributes the space above its heading, the heading, the
    /// space between heading and body, and the body.
    /// Sections whose body is empty still keep the body item (with no lines) so
    /// that headings and bodies always pair up.
    pub fn assemble(report: &Report, stylesheet: &Stylesheet) -> Result<Self, BuildError> {
        let title = report.title().trim();
        if title.is_empty() {
            return Err(BuildError::EmptyTitle);
        }

        let mut items = Vec::with_capacity(2 + report.sections().len() * 4);
        items.push(FlowItem::Title(title.to_owned()));
        items.push(FlowItem::Spacer(stylesheet.after_title_pt()));

        for (section_index, section) in report.sections().iter().enumerate() {
            let heading = section.heading().trim();
            if heading.is_empty() {
                return Err(BuildError::EmptyHeading { section_index });
            }

            let lines = richtext::parse_lines(section.body())
                .map_err(|source| BuildError::Markup {
                    section_index,
                    source,
                })?;

            items.push(FlowItem::Spacer(stylesheet.before_heading_pt()));
            items.push(FlowItem::Heading {
                section_index,
                text: heading.to_owned(),
            });
            items.push(FlowItem::Spacer(stylesheet.after_heading_pt()));
            items.push(FlowItem::Body {
                section_index,
                lines,
            });
        }

        debug!(
            "Assembled flow with {} items for {} sections",
            items.len(),
            report.sections().len()
        );
        Ok(Self { items })
    }

    /// Returns the flow items in document order.
    pub fn items(&self) -> &[FlowItem] {
        &self.items
    }

    /// Consumes the flow and returns its items.
    pub fn into_items(self) -> Vec<FlowItem> {
        self.items
    }

    /// Returns the heading texts in document order.
    pub fn headings(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().filter_map(|item| match item {
            FlowItem::Heading { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the number of title blocks.
    pub fn title_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, FlowItem::Title(_)))
            .count()
    }

    /// Returns the number of body blocks.
    pub fn body_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, FlowItem::Body { .. }))
            .count()
    }
}
