//! Formatting-code text deserializer.
//!
//! Dialog messages and button labels are authored as plain strings with
//! inline codes: `&a` switches to green, `&l` turns on bold, `&r` resets.
//! The legacy `§` prefix is accepted as well.

use super::color::TextColor;
use super::styled::{StyledText, TextStyle};

const CODE_PREFIXES: [char; 2] = ['&', '§'];

/// Reads formatting-coded strings into [`StyledText`].
pub struct FormattingCodes;

#[derive(Clone, Copy)]
enum Code {
    Color(TextColor),
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Obfuscated,
    Reset,
}

impl Code {
    fn from_char(c: char) -> Option<Self> {
        if let Some(color) = TextColor::from_code(c) {
            return Some(Code::Color(color));
        }
        match c.to_ascii_lowercase() {
            'k' => Some(Code::Obfuscated),
            'l' => Some(Code::Bold),
            'm' => Some(Code::Strikethrough),
            'n' => Some(Code::Underline),
            'o' => Some(Code::Italic),
            'r' => Some(Code::Reset),
            _ => None,
        }
    }
}

struct Segment {
    content: String,
    color: Option<TextColor>,
    style: TextStyle,
}

impl FormattingCodes {
    /// Parse `input` into a text tree. Unknown codes are kept literally.
    pub fn deserialize(input: &str) -> StyledText {
        let mut segments: Vec<Segment> = Vec::new();
        let mut current = Segment {
            content: String::new(),
            color: None,
            style: TextStyle::NONE,
        };

        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            if CODE_PREFIXES.contains(&c) {
                if let Some(code) = chars.peek().copied().and_then(Code::from_char) {
                    chars.next();
                    let (color, style) = apply(code, current.color, current.style);
                    if !current.content.is_empty() {
                        segments.push(current);
                    }
                    current = Segment {
                        content: String::new(),
                        color,
                        style,
                    };
                    continue;
                }
            }
            current.content.push(c);
        }
        if !current.content.is_empty() {
            segments.push(current);
        }

        match segments.as_slice() {
            [] => StyledText::of(""),
            [only] if only.color.is_none() && only.style.is_empty() => {
                StyledText::of(only.content.clone())
            }
            _ => segments
                .into_iter()
                .fold(StyledText::builder(), |builder, segment| {
                    let mut child = StyledText::builder()
                        .content(segment.content)
                        .style(segment.style);
                    if let Some(color) = segment.color {
                        child = child.color(color);
                    }
                    builder.append(child.build())
                })
                .build(),
        }
    }

    /// Remove every recognized code, leaving the readable text.
    pub fn strip(input: &str) -> String {
        Self::deserialize(input).to_plain()
    }
}

/// A color code clears decorations; a reset clears both.
fn apply(code: Code, color: Option<TextColor>, style: TextStyle) -> (Option<TextColor>, TextStyle) {
    match code {
        Code::Color(c) => (Some(c), TextStyle::NONE),
        Code::Reset => (Some(TextColor::Reset), TextStyle::NONE),
        Code::Bold => (color, TextStyle { bold: true, ..style }),
        Code::Italic => (color, TextStyle { italic: true, ..style }),
        Code::Underline => (color, TextStyle { underline: true, ..style }),
        Code::Strikethrough => (color, TextStyle { strikethrough: true, ..style }),
        Code::Obfuscated => (color, TextStyle { obfuscated: true, ..style }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string_stays_single_node() {
        let text = FormattingCodes::deserialize("Hello there");
        assert_eq!(text.content(), "Hello there");
        assert!(text.children().is_empty());
        assert_eq!(text.color(), None);
    }

    #[test]
    fn test_color_codes_split_segments() {
        let text = FormattingCodes::deserialize("&6Welcome, &atraveler");
        let spans = text.spans();

        assert_eq!(text.to_plain(), "Welcome, traveler");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].color, Some(TextColor::Gold));
        assert_eq!(spans[1].color, Some(TextColor::Green));
    }

    #[test]
    fn test_styles_accumulate_until_color_change() {
        let text = FormattingCodes::deserialize("&l&obold italic&cred");
        let spans = text.spans();

        assert!(spans[0].style.bold && spans[0].style.italic);
        assert_eq!(spans[1].color, Some(TextColor::Red));
        assert!(spans[1].style.is_empty());
    }

    #[test]
    fn test_reset_clears_inherited_color() {
        let body = FormattingCodes::deserialize("tinted&r plain");
        let text = StyledText::builder().color(TextColor::Blue).append(body).build();
        let spans = text.spans();

        assert_eq!(spans[0].color, Some(TextColor::Blue));
        assert_eq!(spans[1].color, None);
        assert_eq!(text.to_plain(), "tinted plain");
    }

    #[test]
    fn test_unknown_codes_and_trailing_prefix_are_literal() {
        assert_eq!(FormattingCodes::strip("Fish & Chips &z &"), "Fish & Chips &z &");
        assert_eq!(FormattingCodes::strip("§eLegacy"), "Legacy");
    }
}
