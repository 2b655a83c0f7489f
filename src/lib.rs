//! Renders the Wostup post analytics dashboard brief to PDF.
//!
//! A [`model::Report`] is assembled into a [`flow::Flow`] of titles, headings,
//! bodies and spacers, laid out with `genpdf` and written to disk by
//! [`builder::PdfBuilder`].

pub mod builder;
pub mod content;
pub mod elements;
pub mod error;
pub mod flow;
pub mod fonts;
pub mod model;
pub mod richtext;
pub mod styles;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{PdfBuilder, RenderedPdf};
pub use error::BuildError;
pub use model::{Report, Section};
