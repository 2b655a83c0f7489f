//! Font loading utilities for the `wostup_brief` crate.
//!
//! `genpdf` needs TrueType files for layout metrics.  Families are looked up in
//! a list of candidate directories and must follow genpdf's
//! `<Family>-<Style>.ttf` naming; the first directory holding a complete family
//! wins.  When nothing is found the Windows Arial family is tried last.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the preferred font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable that points at a directory of font files.
pub const FONTS_DIR_ENV: &str = "WOSTUP_BRIEF_FONTS_DIR";

/// Environment variable that points at a Windows fonts directory for the Arial fallback.
pub const WINDOWS_FONTS_DIR_ENV: &str = "WOSTUP_BRIEF_WINDOWS_FONTS_DIR";

/// Family names accepted in every candidate directory, in order of preference.
const FAMILY_NAMES: &[&str] = &[DEFAULT_FONT_FAMILY_NAME, "LiberationSans"];

const STYLE_SUFFIXES: &[&str] = &["Regular", "Bold", "Italic", "BoldItalic"];

const SYSTEM_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/local/share/fonts",
];

const WINDOWS_FALLBACK_FAMILY_NAME: &str = "Arial";

struct WindowsFontFiles {
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const WINDOWS_FONT_FILES: WindowsFontFiles = WindowsFontFiles {
    regular: "arial.ttf",
    bold: "arialbd.ttf",
    italic: "ariali.ttf",
    bold_italic: "arialbi.ttf",
};

/// Returns the `assets/fonts` directory of this crate.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn font_directory_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    let mut push = |candidate: PathBuf| {
        if !candidates.iter().any(|existing| existing == &candidate) {
            candidates.push(candidate);
        }
    };

    if let Some(path) = explicit {
        push(path.to_path_buf());
    }

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push(bin_dir.join("assets/fonts"));
        }
    }

    push(bundled_fonts_source_dir());

    for directory in SYSTEM_FONT_DIRECTORIES {
        push(PathBuf::from(directory));
    }

    candidates
}

fn family_file_names(family: &str) -> impl Iterator<Item = String> + '_ {
    STYLE_SUFFIXES
        .iter()
        .map(move |suffix| format!("{family}-{suffix}.ttf"))
}

fn missing_font_files(directory: &Path, family: &str) -> Vec<String> {
    family_file_names(family)
        .filter(|name| !directory.join(name).is_file())
        .collect()
}

/// A directory that holds a complete font family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FontLocation {
    /// Directory containing the font files.
    pub directory: PathBuf,
    /// Family name used as the file name prefix.
    pub family: &'static str,
}

/// Returns the first family complete in `directory`, or why none is.
fn complete_family(directory: &Path) -> Result<&'static str, String> {
    if !directory.is_dir() {
        return Err("directory missing".to_owned());
    }

    let mut reasons = Vec::new();
    for &family in FAMILY_NAMES {
        let missing = missing_font_files(directory, family);
        if missing.is_empty() {
            return Ok(family);
        }
        reasons.push(format!("{}: missing [{}]", family, missing.join(", ")));
    }
    Err(reasons.join("; "))
}

/// The ordered directories searched for a font family, plus the Windows
/// directory used for the Arial fallback.
#[derive(Clone, Debug)]
pub(crate) struct FontSearch {
    explicit: Option<PathBuf>,
    candidates: Vec<PathBuf>,
    windows_dir: Option<PathBuf>,
}

impl FontSearch {
    /// The standard search order, with `explicit` checked first.
    pub(crate) fn standard(explicit: Option<&Path>) -> Self {
        Self {
            explicit: explicit.map(Path::to_path_buf),
            candidates: font_directory_candidates(explicit),
            windows_dir: windows_font_directory(),
        }
    }

    /// A search limited to `candidates`, without the Windows fallback.
    #[cfg(test)]
    pub(crate) fn only(explicit: Option<PathBuf>, candidates: Vec<PathBuf>) -> Self {
        let mut all: Vec<PathBuf> = explicit.iter().cloned().collect();
        all.extend(candidates);
        Self {
            explicit,
            candidates: all,
            windows_dir: None,
        }
    }

    fn resolve(&self) -> Result<FontLocation, Error> {
        let mut attempts = Vec::new();

        for candidate in &self.candidates {
            match complete_family(candidate) {
                Ok(family) => {
                    debug!("Using {} fonts from {}", family, candidate.display());
                    return Ok(FontLocation {
                        directory: candidate.clone(),
                        family,
                    });
                }
                Err(reason) => {
                    if self.explicit.as_deref() == Some(candidate.as_path()) {
                        warn!(
                            "Fonts directory {} is not usable ({}); trying the standard locations",
                            candidate.display(),
                            reason
                        );
                    }
                    attempts.push(format!("{} ({})", candidate.display(), reason));
                }
            }
        }

        let summary = if attempts.is_empty() {
            "no search paths were available".to_owned()
        } else {
            attempts.join(", ")
        };

        Err(Error::new(
            format!(
                "Unable to locate a font family. Checked: {}. See assets/fonts/README.md or set {}.",
                summary, FONTS_DIR_ENV
            ),
            io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
        ))
    }

    /// Loads the first complete family, falling back to Windows Arial when
    /// no candidate directory holds one.
    pub(crate) fn load(&self) -> Result<FontFamily<FontData>, Error> {
        let located = self
            .resolve()
            .and_then(|location| load_located_font_family(&location));

        match located {
            Ok(family) => Ok(family),
            Err(err) if fonts_missing(&err) => {
                match windows_fallback_font_family(self.windows_dir.as_deref()) {
                    Ok(fallback) => {
                        warn!(
                            "No font family found ({}); falling back to Windows '{}' family.",
                            err, WINDOWS_FALLBACK_FAMILY_NAME
                        );
                        Ok(fallback)
                    }
                    Err(fallback_err) => Err(Error::new(
                        format!("{} Windows fallback failed: {}", err, fallback_err),
                        io::Error::new(io::ErrorKind::NotFound, "default fonts are not available"),
                    )),
                }
            }
            Err(err) => Err(err),
        }
    }
}

fn load_located_font_family(location: &FontLocation) -> Result<FontFamily<FontData>, Error> {
    fonts::from_files(&location.directory, location.family, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                location.family,
                location.directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn load_windows_font(directory: &Path, file: &str, style: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load Windows fallback {} font at {}: {}",
                style,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn windows_fallback_font_family(directory: Option<&Path>) -> Result<FontFamily<FontData>, Error> {
    let directory = directory.ok_or_else(|| {
        Error::new(
            "Windows font directory not found for fallback",
            io::Error::new(io::ErrorKind::NotFound, "windows fonts directory not found"),
        )
    })?;

    Ok(FontFamily {
        regular: load_windows_font(directory, WINDOWS_FONT_FILES.regular, "regular")?,
        bold: load_windows_font(directory, WINDOWS_FONT_FILES.bold, "bold")?,
        italic: load_windows_font(directory, WINDOWS_FONT_FILES.italic, "italic")?,
        bold_italic: load_windows_font(directory, WINDOWS_FONT_FILES.bold_italic, "bold italic")?,
    })
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Indicates whether a complete font family can be found without the Windows fallback.
pub fn default_fonts_available() -> bool {
    FontSearch::standard(None).resolve().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_files_follow_genpdf_naming() {
        let names: Vec<_> = family_file_names("Roboto").collect();
        assert_eq!(
            names,
            [
                "Roboto-Regular.ttf",
                "Roboto-Bold.ttf",
                "Roboto-Italic.ttf",
                "Roboto-BoldItalic.ttf"
            ]
        );
    }

    #[test]
    fn explicit_directory_is_searched_first() {
        let explicit = Path::new("/opt/brief-fonts");
        let candidates = font_directory_candidates(Some(explicit));
        assert_eq!(candidates.first().map(PathBuf::as_path), Some(explicit));
        assert!(candidates.contains(&bundled_fonts_source_dir()));
    }

    #[test]
    fn partial_family_is_reported_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("Roboto-Regular.ttf"), b"").expect("write stub");
        let missing = missing_font_files(dir.path(), "Roboto");
        assert_eq!(
            missing,
            ["Roboto-Bold.ttf", "Roboto-Italic.ttf", "Roboto-BoldItalic.ttf"]
        );
    }

    fn stub_family(directory: &Path, family: &str) {
        for name in family_file_names(family) {
            std::fs::write(directory.join(name), b"").expect("write stub");
        }
    }

    #[test]
    fn empty_directories_report_every_attempt() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        let search = FontSearch::only(
            None,
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
        );

        let err = search.load().unwrap_err();
        assert!(fonts_missing(&err));
        let message = err.to_string();
        assert!(message.contains("Unable to locate a font family"), "{message}");
        assert!(message.contains(&first.path().display().to_string()), "{message}");
        assert!(message.contains(&second.path().display().to_string()), "{message}");
        assert!(message.contains("Roboto: missing [Roboto-Regular.ttf"), "{message}");
        assert!(message.contains("Windows fallback failed"), "{message}");
    }

    #[test]
    fn unusable_explicit_directory_falls_through_to_the_next_candidate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("not-there");
        let stocked = dir.path().join("fonts");
        std::fs::create_dir(&stocked).expect("fonts dir");
        stub_family(&stocked, "LiberationSans");

        assert_eq!(
            complete_family(&missing),
            Err("directory missing".to_owned())
        );
        let location = FontSearch::only(Some(missing), vec![stocked.clone()])
            .resolve()
            .expect("second candidate is complete");
        assert_eq!(
            location,
            FontLocation {
                directory: stocked,
                family: "LiberationSans",
            }
        );
    }

    #[test]
    fn preferred_family_wins_within_a_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        stub_family(dir.path(), "LiberationSans");
        stub_family(dir.path(), DEFAULT_FONT_FAMILY_NAME);
        assert_eq!(complete_family(dir.path()), Ok(DEFAULT_FONT_FAMILY_NAME));
    }
}
