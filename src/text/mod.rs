//! Text primitives: colors, styled text trees, formatting codes and books.

pub mod book;
pub mod color;
pub mod serializer;
pub mod styled;

pub use book::{BookView, BookViewBuilder};
pub use color::TextColor;
pub use serializer::FormattingCodes;
pub use styled::{ClickAction, StyledText, TextBuilder, TextSpan, TextStyle};
