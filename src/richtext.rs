//! Utilities for working with styled text fragments.
//!
//! Section bodies are written in a small tag-based inline markup (bold, italic, color and line
//! break tags).  This module parses that markup into [`Span`]s, which carry the subset
//! of styling information supported by [`genpdf`][genpdf], and splits them into lines at explicit
//! breaks so the element layer can lay out one paragraph per line.
//!
//! [genpdf]: https://docs.rs/genpdf/

use std::fmt;

use genpdf::style::{Color, Style, StyledString};

/// A slice of text together with inline style attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the configured color for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Sets the bold flag and returns the updated span.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic flag and returns the updated span.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Sets the span color and returns the updated span.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(self) -> Self {
        self.with_bold(true)
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(self) -> Self {
        self.with_italic(true)
    }

    /// Convenience shorthand that assigns a color to the span.
    pub fn colored(self, color: Color) -> Self {
        self.with_color(Some(color))
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span to a [`StyledString`].
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

impl From<Span> for StyledString {
    fn from(span: Span) -> Self {
        span.to_styled_string()
    }
}

/// A parsed inline item: either styled text or an explicit line break.
#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    /// Styled text.
    Text(Span),
    /// A `<br/>` line break.
    LineBreak,
}

/// One visual line of body text.
pub type Line = Vec<Span>;

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the original input string where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the parsing error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl StyleState {
    fn to_span(self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            color: self.color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
    Font,
}

impl Marker {
    fn closing_token(self) -> &'static str {
        match self {
            Marker::Bold => "</b>",
            Marker::Italic => "</i>",
            Marker::Font => "</font>",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Marker::Bold => "`<b>` element",
            Marker::Italic => "`<i>` element",
            Marker::Font => "`<font>` element",
        }
    }
}

const LINE_BREAKS: &[&str] = &["<br/>", "<br />", "<br>"];

/// Parses inline markup into a sequence of [`Inline`] items.
///
/// The supported constructs are:
///
/// - `<b>bold</b>` and `<i>italic</i>`, which may nest
/// - `<br/>` (also `<br />` and `<br>`) for an explicit line break
/// - `<font color="#RRGGBB">text</font>` for colored text
/// - the entities `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;` and `&nbsp;`
///
/// Runs of whitespace collapse to a single space, also when the run straddles a tag.  Malformed
/// input yields a [`ParseError`] with the byte position of the problem.
pub fn parse_markup(input: &str) -> Result<Vec<Inline>, ParseError> {
    let mut after_space = false;
    let (items, _) = parse_inner(input, 0, StyleState::default(), None, &mut after_space)?;
    Ok(items)
}

/// Parses inline markup and splits the result into lines at explicit breaks.
///
/// Leading and trailing whitespace is trimmed from every line.  Input without any text yields no
/// lines at all.
pub fn parse_lines(input: &str) -> Result<Vec<Line>, ParseError> {
    let items = parse_markup(input)?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let mut lines: Vec<Line> = vec![Vec::new()];
    for item in items {
        match item {
            Inline::Text(span) => {
                if let Some(line) = lines.last_mut() {
                    line.push(span);
                }
            }
            Inline::LineBreak => lines.push(Vec::new()),
        }
    }

    for line in &mut lines {
        trim_line(line);
    }
    if lines.iter().all(Vec::is_empty) {
        lines.clear();
    }
    Ok(lines)
}

fn trim_line(line: &mut Line) {
    if let Some(first) = line.first_mut() {
        first.text = first.text.trim_start().to_owned();
    }
    if let Some(last) = line.last_mut() {
        last.text = last.text.trim_end().to_owned();
    }
    line.retain(|span| !span.text.is_empty());
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    closing_marker: Option<Marker>,
    after_space: &mut bool,
) -> Result<(Vec<Inline>, usize), ParseError> {
    let mut items = Vec::new();
    let mut buffer = String::new();

    while index < input.len() {
        let rest = &input[index..];

        if let Some(marker) = closing_marker {
            if rest.starts_with(marker.closing_token()) {
                flush_buffer(&mut buffer, &mut items, state);
                index += marker.closing_token().len();
                return Ok((items, index));
            }
        }

        if let Some(token) = LINE_BREAKS.iter().find(|token| rest.starts_with(**token)) {
            flush_buffer(&mut buffer, &mut items, state);
            items.push(Inline::LineBreak);
            *after_space = true;
            index += token.len();
            continue;
        }

        if rest.starts_with("<b>") || rest.starts_with("<i>") {
            flush_buffer(&mut buffer, &mut items, state);
            let mut nested_state = state;
            let marker = if rest.starts_with("<b>") {
                nested_state.bold = true;
                Marker::Bold
            } else {
                nested_state.italic = true;
                Marker::Italic
            };
            let (nested, new_index) = parse_inner(input, index + 3, nested_state, Some(marker), after_space)?;
            items.extend(nested);
            index = new_index;
            continue;
        }

        if rest.starts_with("<font") {
            let (color, after_tag) = parse_font_tag(input, index)?;
            flush_buffer(&mut buffer, &mut items, state);
            let mut nested_state = state;
            nested_state.color = Some(color);
            let (nested, new_index) = parse_inner(
                input,
                after_tag,
                nested_state,
                Some(Marker::Font),
                after_space,
            )?;
            items.extend(nested);
            index = new_index;
            continue;
        }

        if rest.starts_with("</") {
            let tag_end = rest.find('>').map(|end| end + 1).unwrap_or(rest.len());
            return Err(ParseError::new(
                index,
                format!("unexpected closing tag `{}`", &rest[..tag_end]),
            ));
        }

        if rest.starts_with('<') {
            return Err(ParseError::new(
                index,
                "unsupported tag; expected `<b>`, `<i>`, `<br/>` or `<font color=\"#RRGGBB\">`",
            ));
        }

        if rest.starts_with('&') {
            let (ch, consumed) = parse_entity(input, index)?;
            buffer.push(ch);
            *after_space = false;
            index += consumed;
            continue;
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch.is_whitespace() {
            if !*after_space {
                buffer.push(' ');
                *after_space = true;
            }
        } else {
            buffer.push(ch);
            *after_space = false;
        }
        index += ch.len_utf8();
    }

    if let Some(marker) = closing_marker {
        Err(ParseError::new(
            index,
            format!("unterminated {}", marker.description()),
        ))
    } else {
        flush_buffer(&mut buffer, &mut items, state);
        Ok((items, index))
    }
}

fn flush_buffer(buffer: &mut String, items: &mut Vec<Inline>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    items.push(Inline::Text(state.to_span(std::mem::take(buffer))));
}

fn parse_entity(input: &str, index: usize) -> Result<(char, usize), ParseError> {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", '\u{a0}'),
    ];

    let rest = &input[index..];
    ENTITIES
        .iter()
        .find(|(name, _)| rest.starts_with(name))
        .map(|(name, ch)| (*ch, name.len()))
        .ok_or_else(|| {
            ParseError::new(
                index,
                "unknown entity; escape a literal ampersand as `&amp;`",
            )
        })
}

fn parse_font_tag(input: &str, index: usize) -> Result<(Color, usize), ParseError> {
    const PREFIX: &str = "<font";
    let mut cursor = skip_spaces(input, index + PREFIX.len());

    if !input[cursor..].starts_with("color=") {
        return Err(ParseError::new(
            cursor,
            "expected `color=` attribute in `<font>` tag",
        ));
    }
    cursor += "color=".len();

    let quote = match input[cursor..].chars().next() {
        Some(quote @ ('"' | '\'')) => quote,
        _ => {
            return Err(ParseError::new(
                cursor,
                "expected quoted color value in `<font>` tag",
            ))
        }
    };
    cursor += 1;

    if !input[cursor..].starts_with('#') {
        return Err(ParseError::new(
            cursor,
            "expected `#` followed by a hexadecimal RGB value",
        ));
    }

    let hex_start = cursor + 1;
    let hex_end = hex_start + 6;
    let hex = input
        .get(hex_start..hex_end)
        .ok_or_else(|| {
            ParseError::new(
                hex_start,
                "incomplete color specification; expected 6 hexadecimal digits",
            )
        })?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError::new(
            hex_start,
            "invalid RGB specification; use hexadecimal digits only",
        ));
    }

    let channel = |offset: usize| {
        u8::from_str_radix(&hex[offset..offset + 2], 16)
            .map_err(|err| ParseError::new(hex_start + offset, err.to_string()))
    };
    let color = Color::Rgb(channel(0)?, channel(2)?, channel(4)?);

    cursor = hex_end;
    if !input[cursor..].starts_with(quote) {
        return Err(ParseError::new(cursor, "unterminated color attribute"));
    }
    cursor = skip_spaces(input, cursor + 1);

    if !input[cursor..].starts_with('>') {
        return Err(ParseError::new(cursor, "expected `>` to close `<font>` tag"));
    }

    Ok((color, cursor + 1))
}

fn skip_spaces(input: &str, mut index: usize) -> usize {
    while input[index..].starts_with(' ') {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<&str> {
        line.iter().map(Span::text).collect()
    }

    #[test]
    fn span_to_style_reflects_flags() {
        let span = Span::new("Hello")
            .bold()
            .italic()
            .colored(Color::Rgb(10, 20, 30));
        let styled = span.to_styled_string();
        assert_eq!(styled.s, "Hello");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn parse_plain_text() {
        let items = parse_markup("Hello world").expect("parse succeeds");
        assert_eq!(items, vec![Inline::Text(Span::new("Hello world"))]);
    }

    #[test]
    fn parse_nested_styles() {
        let items = parse_markup("This is <b>very <i>cool</i></b>!").expect("parse succeeds");
        let spans: Vec<_> = items
            .iter()
            .filter_map(|item| match item {
                Inline::Text(span) => Some(span),
                Inline::LineBreak => None,
            })
            .collect();
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].text(), "This is ");
        assert!(!spans[0].is_bold());
        assert!(spans[1].is_bold());
        assert_eq!(spans[1].text(), "very ");
        assert!(spans[2].is_bold());
        assert!(spans[2].is_italic());
        assert_eq!(spans[2].text(), "cool");
        assert_eq!(spans[3].text(), "!");
        assert!(!spans[3].is_bold());
    }

    #[test]
    fn line_breaks_split_bullets() {
        let lines = parse_lines("• Total Views<br/>• Unique Viewers<br />• Total Likes")
            .expect("parse succeeds");
        assert_eq!(lines.len(), 3);
        assert_eq!(texts(&lines[0]), ["• Total Views"]);
        assert_eq!(texts(&lines[1]), ["• Unique Viewers"]);
        assert_eq!(texts(&lines[2]), ["• Total Likes"]);
    }

    #[test]
    fn break_inside_bold_keeps_style_on_both_lines() {
        let lines = parse_lines("<b>one<br/>two</b>").expect("parse succeeds");
        assert_eq!(lines.len(), 2);
        assert!(lines[0][0].is_bold());
        assert!(lines[1][0].is_bold());
        assert_eq!(lines[1][0].text(), "two");
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(parse_lines("").expect("parse succeeds").is_empty());
        assert!(parse_lines("  <br/> ").expect("parse succeeds").is_empty());
    }

    #[test]
    fn whitespace_collapses_and_lines_are_trimmed() {
        let lines = parse_lines("  spaced \n  out  <br/>  next").expect("parse succeeds");
        assert_eq!(texts(&lines[0]), ["spaced out"]);
        assert_eq!(texts(&lines[1]), ["next"]);
    }

    #[test]
    fn whitespace_collapses_across_tags() {
        let lines = parse_lines("a <b> b</b> <i> c</i>").expect("parse succeeds");
        assert_eq!(texts(&lines[0]), ["a ", "b", " ", "c"]);
        assert!(lines[0][1].is_bold());
        assert!(lines[0][3].is_italic());
    }

    #[test]
    fn parse_font_color() {
        let items = parse_markup("<font color=\"#ff0000\">Red</font> text").expect("parse succeeds");
        assert_eq!(
            items,
            vec![
                Inline::Text(Span::new("Red").colored(Color::Rgb(0xff, 0x00, 0x00))),
                Inline::Text(Span::new(" text")),
            ]
        );
    }

    #[test]
    fn entities_are_decoded() {
        let lines = parse_lines("Likes &amp; Comments &lt;3").expect("parse succeeds");
        assert_eq!(texts(&lines[0]), ["Likes & Comments <3"]);
    }

    #[test]
    fn quotes_pass_through_literally() {
        let lines = parse_lines("Interest signals (\"interested\", \"apply\")").expect("parse");
        assert_eq!(texts(&lines[0]), ["Interest signals (\"interested\", \"apply\")"]);
    }

    #[test]
    fn error_on_unterminated_bold() {
        let err = parse_markup("<b>oops").unwrap_err();
        assert!(err.message().contains("unterminated `<b>`"));
    }

    #[test]
    fn error_on_mismatched_closing_tag() {
        let err = parse_markup("<b>bold</i>").unwrap_err();
        assert!(err.message().contains("unexpected closing tag `</i>`"));
        assert_eq!(err.index(), 7);
    }

    #[test]
    fn error_on_invalid_color() {
        let err = parse_markup("<font color=\"#12FG34\">x</font>").unwrap_err();
        assert!(err.message().contains("invalid RGB"));
    }

    #[test]
    fn error_on_bare_ampersand() {
        let err = parse_markup("R&D").unwrap_err();
        assert_eq!(err.index(), 1);
    }

    #[test]
    fn error_on_unknown_tag() {
        let err = parse_markup("<u>under</u>").unwrap_err();
        assert!(err.message().contains("unsupported tag"));
    }
}
