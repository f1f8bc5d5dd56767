//! Editor commands and user-input validation.
//!
//! `Command` is the closed set of primitive mutations the dispatcher knows
//! how to run. Each variant carries only the parameters it needs and maps to
//! exactly one platform rich-text command.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::CommandInputError;

/// Largest table the insert-table command accepts in either dimension.
pub const MAX_TABLE_DIMENSION: usize = 20;

/// Inline format toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
}

/// Block types for `formatBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    /// Heading level, clamped to 1..=6.
    Heading(u8),
    Quote,
    Preformatted,
}

impl BlockType {
    fn tag(self) -> Cow<'static, str> {
        match self {
            Self::Paragraph => "<p>".into(),
            Self::Heading(level) => format!("<h{}>", level.clamp(1, 6)).into(),
            Self::Quote => "<blockquote>".into(),
            Self::Preformatted => "<pre>".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

/// List element produced by the platform's list toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// List flavours offered to the user. `Plain` is an unordered list tagged so
/// it renders without bullets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListStyle {
    Plain,
    Bulleted,
    Numbered,
}

impl ListStyle {
    pub fn kind(self) -> ListKind {
        match self {
            Self::Plain | Self::Bulleted => ListKind::Unordered,
            Self::Numbered => ListKind::Ordered,
        }
    }
}

/// Attribute and value marking a plain list element.
pub const PLAIN_LIST_MARKER: (&str, &str) = ("data-list-style", "plain");

/// A primitive mutation of the editable surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Toggle(InlineFormat),
    SetBlock(BlockType),
    Align(Alignment),
    List(ListKind),
    Indent,
    Outdent,
    InsertHtml(String),
    InsertText(String),
    CreateLink(String),
    Unlink,
    RemoveFormat,
    FontName(String),
    /// Legacy `fontSize` scale, clamped to 1..=7.
    FontSize(u8),
    ForeColor(String),
    BackColor(String),
    InsertHorizontalRule,
}

impl Command {
    pub fn bold() -> Self {
        Self::Toggle(InlineFormat::Bold)
    }

    pub fn italic() -> Self {
        Self::Toggle(InlineFormat::Italic)
    }

    pub fn underline() -> Self {
        Self::Toggle(InlineFormat::Underline)
    }

    /// Platform command name and value for this mutation.
    pub fn platform_command(&self) -> (&'static str, Option<Cow<'_, str>>) {
        match self {
            Self::Toggle(format) => {
                let name = match format {
                    InlineFormat::Bold => "bold",
                    InlineFormat::Italic => "italic",
                    InlineFormat::Underline => "underline",
                    InlineFormat::Strikethrough => "strikeThrough",
                    InlineFormat::Superscript => "superscript",
                    InlineFormat::Subscript => "subscript",
                };
                (name, None)
            }
            Self::SetBlock(block) => ("formatBlock", Some(block.tag())),
            Self::Align(alignment) => {
                let name = match alignment {
                    Alignment::Left => "justifyLeft",
                    Alignment::Center => "justifyCenter",
                    Alignment::Right => "justifyRight",
                    Alignment::Justify => "justifyFull",
                };
                (name, None)
            }
            Self::List(ListKind::Ordered) => ("insertOrderedList", None),
            Self::List(ListKind::Unordered) => ("insertUnorderedList", None),
            Self::Indent => ("indent", None),
            Self::Outdent => ("outdent", None),
            Self::InsertHtml(html) => ("insertHTML", Some(Cow::Borrowed(html))),
            Self::InsertText(text) => ("insertText", Some(Cow::Borrowed(text))),
            Self::CreateLink(url) => ("createLink", Some(Cow::Borrowed(url))),
            Self::Unlink => ("unlink", None),
            Self::RemoveFormat => ("removeFormat", None),
            Self::FontName(font) => ("fontName", Some(Cow::Borrowed(font))),
            Self::FontSize(size) => ("fontSize", Some((*size).clamp(1, 7).to_string().into())),
            Self::ForeColor(color) => ("foreColor", Some(Cow::Borrowed(color))),
            Self::BackColor(color) => ("hiliteColor", Some(Cow::Borrowed(color))),
            Self::InsertHorizontalRule => ("insertHorizontalRule", None),
        }
    }
}

/// Outcome of a command that may need user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The surface was mutated.
    Applied,
    /// The user cancelled or supplied invalid input; nothing changed.
    Aborted,
    /// The editor is disabled or not mounted.
    Ignored,
    /// Waiting on an external collaborator (image upload).
    Pending,
}

/// Normalize a user-supplied link target.
///
/// Bare domains get `https://`; only `http`, `https` and `mailto` are
/// accepted.
pub fn normalize_link_url(input: &str) -> Result<String, CommandInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(CommandInputError::InvalidUrl(input.to_string()));
    }

    let candidate = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{trimmed}"))
                .map_err(|_| CommandInputError::InvalidUrl(input.to_string()))?
        }
        Err(_) => return Err(CommandInputError::InvalidUrl(input.to_string())),
    };

    match candidate.scheme() {
        "http" | "https"
            if candidate
                .host_str()
                .is_some_and(|h| h.contains('.') || h == "localhost") =>
        {
            Ok(candidate.to_string())
        }
        "mailto" if !candidate.path().is_empty() => Ok(candidate.to_string()),
        _ => Err(CommandInputError::InvalidUrl(input.to_string())),
    }
}

static TABLE_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,3})\s*[x×X*,]\s*(\d{1,3})\s*$").expect("valid table size regex")
});

/// Parse `"R x C"` into `(rows, cols)`.
pub fn parse_table_size(input: &str) -> Result<(usize, usize), CommandInputError> {
    let invalid = || CommandInputError::InvalidTableSize {
        input: input.to_string(),
        max: MAX_TABLE_DIMENSION,
    };
    let caps = TABLE_SIZE_RE.captures(input).ok_or_else(invalid)?;
    let rows = parse_dimension(&caps[1]).ok_or_else(invalid)?;
    let cols = parse_dimension(&caps[2]).ok_or_else(invalid)?;
    Ok((rows, cols))
}

/// Parse one table dimension in `1..=MAX_TABLE_DIMENSION`.
pub fn parse_table_dimension(input: &str) -> Result<usize, CommandInputError> {
    parse_dimension(input).ok_or_else(|| CommandInputError::InvalidTableSize {
        input: input.to_string(),
        max: MAX_TABLE_DIMENSION,
    })
}

fn parse_dimension(input: &str) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_TABLE_DIMENSION).contains(n))
}

/// An embeddable video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRef {
    YouTube(String),
    Vimeo(String),
}

impl VideoRef {
    pub fn embed_url(&self) -> String {
        match self {
            Self::YouTube(id) => format!("https://www.youtube.com/embed/{id}"),
            Self::Vimeo(id) => format!("https://player.vimeo.com/video/{id}"),
        }
    }
}

static YOUTUBE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid youtube id regex"));

/// Parse a YouTube or Vimeo URL (or a bare 11-character YouTube id).
pub fn parse_video_ref(input: &str) -> Result<VideoRef, CommandInputError> {
    let trimmed = input.trim();
    let invalid = || CommandInputError::InvalidVideo(input.to_string());

    if YOUTUBE_ID_RE.is_match(trimmed) {
        return Ok(VideoRef::YouTube(trimmed.to_string()));
    }

    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{trimmed}")))
        .map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?.trim_start_matches("www.");
    let mut segments = url.path_segments().map(|s| s.collect::<Vec<_>>()).unwrap_or_default();
    segments.retain(|s| !s.is_empty());

    let youtube_id = match host {
        "youtube.com" | "m.youtube.com" => match segments.as_slice() {
            ["watch"] => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            ["embed", id] | ["shorts", id] | ["live", id] => Some(id.to_string()),
            _ => None,
        },
        "youtu.be" => segments.first().map(|id| id.to_string()),
        "vimeo.com" | "player.vimeo.com" => {
            return segments
                .iter()
                .rev()
                .find(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
                .map(|id| VideoRef::Vimeo(id.to_string()))
                .ok_or_else(invalid);
        }
        _ => None,
    };

    youtube_id
        .filter(|id| YOUTUBE_ID_RE.is_match(id))
        .map(VideoRef::YouTube)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_command_names() {
        assert_eq!(Command::bold().platform_command(), ("bold", None));
        assert_eq!(
            Command::Toggle(InlineFormat::Strikethrough).platform_command().0,
            "strikeThrough"
        );
        let (name, value) = Command::SetBlock(BlockType::Heading(9)).platform_command();
        assert_eq!(name, "formatBlock");
        assert_eq!(value.as_deref(), Some("<h6>"));
        assert_eq!(
            Command::Align(Alignment::Justify).platform_command().0,
            "justifyFull"
        );
        assert_eq!(
            Command::List(ListKind::Ordered).platform_command().0,
            "insertOrderedList"
        );
        let (name, value) = Command::FontSize(12).platform_command();
        assert_eq!(name, "fontSize");
        assert_eq!(value.as_deref(), Some("7"));
        assert_eq!(
            Command::BackColor("#ff0".into()).platform_command().0,
            "hiliteColor"
        );
    }

    #[test]
    fn test_list_style_kind() {
        assert_eq!(ListStyle::Plain.kind(), ListKind::Unordered);
        assert_eq!(ListStyle::Bulleted.kind(), ListKind::Unordered);
        assert_eq!(ListStyle::Numbered.kind(), ListKind::Ordered);
    }

    #[test]
    fn test_normalize_link_url() {
        assert_eq!(
            normalize_link_url("https://example.com/page").unwrap(),
            "https://example.com/page"
        );
        assert_eq!(
            normalize_link_url("  example.com ").unwrap(),
            "https://example.com/"
        );
        assert_eq!(
            normalize_link_url("mailto:shop@example.com").unwrap(),
            "mailto:shop@example.com"
        );
        assert!(normalize_link_url("").is_err());
        assert!(normalize_link_url("not a url").is_err());
        assert!(normalize_link_url("javascript:alert(1)").is_err());
        assert!(normalize_link_url("nodot").is_err());
    }

    #[test]
    fn test_parse_table_size() {
        assert_eq!(parse_table_size("3x4").unwrap(), (3, 4));
        assert_eq!(parse_table_size(" 2 X 2 ").unwrap(), (2, 2));
        assert_eq!(parse_table_size("5, 1").unwrap(), (5, 1));
        assert!(parse_table_size("0x3").is_err());
        assert!(parse_table_size("21x3").is_err());
        assert!(parse_table_size("three by four").is_err());
        assert_eq!(parse_table_dimension("20").unwrap(), 20);
        assert!(parse_table_dimension("-1").is_err());
    }

    #[test]
    fn test_parse_video_ref() {
        let expected = VideoRef::YouTube("dQw4w9WgXcQ".into());
        assert_eq!(
            parse_video_ref("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10").unwrap(),
            expected
        );
        assert_eq!(parse_video_ref("https://youtu.be/dQw4w9WgXcQ").unwrap(), expected);
        assert_eq!(
            parse_video_ref("youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            expected
        );
        assert_eq!(
            parse_video_ref("https://youtube.com/shorts/dQw4w9WgXcQ").unwrap(),
            expected
        );
        assert_eq!(parse_video_ref("dQw4w9WgXcQ").unwrap(), expected);
        assert_eq!(
            parse_video_ref("https://vimeo.com/76979871").unwrap(),
            VideoRef::Vimeo("76979871".into())
        );
        assert_eq!(
            VideoRef::Vimeo("76979871".into()).embed_url(),
            "https://player.vimeo.com/video/76979871"
        );
    }

    #[test]
    fn test_parse_video_ref_rejects() {
        for bad in [
            "",
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch",
            "https://vimeo.com/channels/staff",
            "hello world",
        ] {
            assert!(
                matches!(parse_video_ref(bad), Err(CommandInputError::InvalidVideo(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
