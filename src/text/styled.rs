//! Styled text tree with clickable nodes.
//!
//! A `StyledText` is a node with its own content, an optional color and
//! style, an optional click action, and ordered children. Children inherit
//! the color of their parent unless they set one themselves.

use std::fmt;
use std::sync::Arc;

use super::color::TextColor;
use crate::player::Player;

/// Decorations applied on top of a color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub obfuscated: bool,
}

impl TextStyle {
    pub const NONE: TextStyle = TextStyle {
        bold: false,
        italic: false,
        underline: false,
        strikethrough: false,
        obfuscated: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Union of two styles; a child never removes a parent decoration.
    pub fn and(self, other: TextStyle) -> TextStyle {
        TextStyle {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
            strikethrough: self.strikethrough || other.strikethrough,
            obfuscated: self.obfuscated || other.obfuscated,
        }
    }
}

type Callback = dyn Fn(&Player) + Send + Sync;

/// Deferred work bound to a piece of text, run when a player clicks it.
#[derive(Clone)]
pub struct ClickAction {
    callback: Arc<Callback>,
}

impl ClickAction {
    pub fn execute_callback<F>(callback: F) -> Self
    where
        F: Fn(&Player) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Run the bound callback on behalf of `player`.
    pub fn click(&self, player: &Player) {
        (self.callback)(player)
    }
}

impl fmt::Debug for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickAction(<callback>)")
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyledText {
    content: String,
    color: Option<TextColor>,
    style: TextStyle,
    on_click: Option<ClickAction>,
    children: Vec<StyledText>,
}

/// A flattened run of text with its effective formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan<'a> {
    pub text: &'a str,
    pub color: Option<TextColor>,
    pub style: TextStyle,
    /// Index into [`StyledText::clickables`] when the span is clickable.
    pub link: Option<usize>,
}

impl StyledText {
    /// Unformatted text node.
    pub fn of(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn builder() -> TextBuilder {
        TextBuilder::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn color(&self) -> Option<TextColor> {
        self.color
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn on_click(&self) -> Option<&ClickAction> {
        self.on_click.as_ref()
    }

    pub fn children(&self) -> &[StyledText] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.children.iter().all(StyledText::is_empty)
    }

    /// All text of the tree with formatting dropped, in display order.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.collect_plain(&mut out);
        out
    }

    fn collect_plain(&self, out: &mut String) {
        out.push_str(&self.content);
        for child in &self.children {
            child.collect_plain(out);
        }
    }

    /// Click actions of the tree in display order.
    pub fn clickables(&self) -> Vec<&ClickAction> {
        let mut out = Vec::new();
        self.collect_clickables(&mut out);
        out
    }

    fn collect_clickables<'a>(&'a self, out: &mut Vec<&'a ClickAction>) {
        if let Some(action) = &self.on_click {
            out.push(action);
        }
        for child in &self.children {
            child.collect_clickables(out);
        }
    }

    /// Flatten the tree into runs carrying their effective color, style and
    /// link index. Empty runs are dropped.
    pub fn spans(&self) -> Vec<TextSpan<'_>> {
        let mut out = Vec::new();
        let mut next_link = 0;
        self.collect_spans(None, TextStyle::NONE, None, &mut next_link, &mut out);
        out
    }

    fn collect_spans<'a>(
        &'a self,
        inherited_color: Option<TextColor>,
        inherited_style: TextStyle,
        inherited_link: Option<usize>,
        next_link: &mut usize,
        out: &mut Vec<TextSpan<'a>>,
    ) {
        let color = match self.color {
            Some(TextColor::Reset) => None,
            Some(color) => Some(color),
            None => inherited_color,
        };
        let style = inherited_style.and(self.style);
        let link = if self.on_click.is_some() {
            let index = *next_link;
            *next_link += 1;
            Some(index)
        } else {
            inherited_link
        };

        if !self.content.is_empty() {
            out.push(TextSpan {
                text: &self.content,
                color,
                style,
                link,
            });
        }
        for child in &self.children {
            child.collect_spans(color, style, link, next_link, out);
        }
    }
}

impl From<&str> for StyledText {
    fn from(value: &str) -> Self {
        StyledText::of(value)
    }
}

impl From<String> for StyledText {
    fn from(value: String) -> Self {
        StyledText::of(value)
    }
}

#[derive(Debug, Default)]
pub struct TextBuilder {
    text: StyledText,
}

impl TextBuilder {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.text.content = content.into();
        self
    }

    pub fn append(mut self, child: impl Into<StyledText>) -> Self {
        self.text.children.push(child.into());
        self
    }

    pub fn color(mut self, color: TextColor) -> Self {
        self.text.color = Some(color);
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.text.style = style;
        self
    }

    pub fn on_click(mut self, action: ClickAction) -> Self {
        self.text.on_click = Some(action);
        self
    }

    pub fn build(self) -> StyledText {
        self.text
    }
}
