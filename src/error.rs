//! The single failure category of a report build.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::richtext::ParseError;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::BookmarkError;

/// Errors that abort a report build.
///
/// Every failure while assembling, rendering or writing the document surfaces
/// as one of these variants; none of them is recovered from locally.
#[derive(Debug)]
pub enum BuildError {
    /// The report title is empty or whitespace.
    EmptyTitle,
    /// A section heading is empty or whitespace.
    EmptyHeading {
        /// Zero-based index of the offending section.
        section_index: usize,
    },
    /// A section body contains malformed markup.
    Markup {
        /// Zero-based index of the offending section.
        section_index: usize,
        /// The underlying parse failure.
        source: ParseError,
    },
    /// No usable font family could be loaded.
    FontLoad(genpdf::error::Error),
    /// The layout engine failed to lay out or serialize the document.
    Render(genpdf::error::Error),
    /// Section bookmarks could not be embedded into the rendered bytes.
    #[cfg(feature = "bookmarks")]
    Bookmarks(BookmarkError),
    /// The output path does not name a file.
    InvalidOutputPath {
        /// The rejected path.
        path: PathBuf,
    },
    /// Writing the output file failed.
    Write {
        /// The requested output path.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Report title must not be empty"),
            Self::EmptyHeading { section_index } => {
                write!(f, "Section {} has an empty heading", section_index + 1)
            }
            Self::Markup { section_index, .. } => write!(
                f,
                "Section {} contains body markup that cannot be rendered",
                section_index + 1
            ),
            Self::FontLoad(err) => write!(f, "Failed to load fonts: {err}"),
            Self::Render(err) => write!(f, "Failed to render PDF document: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => write!(f, "Failed to embed section bookmarks: {err}"),
            Self::InvalidOutputPath { path } => {
                write!(f, "Output path {} does not name a file", path.display())
            }
            Self::Write { path, .. } => write!(f, "Failed to write {}", path.display()),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Markup { source, .. } => Some(source),
            Self::FontLoad(err) | Self::Render(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => Some(err),
            Self::Write { source, .. } => Some(source),
            Self::EmptyTitle | Self::EmptyHeading { .. } | Self::InvalidOutputPath { .. } => None,
        }
    }
}

#[cfg(feature = "bookmarks")]
impl From<BookmarkError> for BuildError {
    fn from(err: BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}
