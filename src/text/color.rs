//! Fixed text color palette.

/// Colors a piece of book or chat text can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    /// Clears any inherited color.
    Reset,
}

impl TextColor {
    pub const ALL: [TextColor; 17] = [
        TextColor::Black,
        TextColor::DarkBlue,
        TextColor::DarkGreen,
        TextColor::DarkAqua,
        TextColor::DarkRed,
        TextColor::DarkPurple,
        TextColor::Gold,
        TextColor::Gray,
        TextColor::DarkGray,
        TextColor::Blue,
        TextColor::Green,
        TextColor::Aqua,
        TextColor::Red,
        TextColor::LightPurple,
        TextColor::Yellow,
        TextColor::White,
        TextColor::Reset,
    ];

    /// Registry name of the color (e.g. `DARK_AQUA`)
    pub fn name(&self) -> &'static str {
        match self {
            TextColor::Black => "BLACK",
            TextColor::DarkBlue => "DARK_BLUE",
            TextColor::DarkGreen => "DARK_GREEN",
            TextColor::DarkAqua => "DARK_AQUA",
            TextColor::DarkRed => "DARK_RED",
            TextColor::DarkPurple => "DARK_PURPLE",
            TextColor::Gold => "GOLD",
            TextColor::Gray => "GRAY",
            TextColor::DarkGray => "DARK_GRAY",
            TextColor::Blue => "BLUE",
            TextColor::Green => "GREEN",
            TextColor::Aqua => "AQUA",
            TextColor::Red => "RED",
            TextColor::LightPurple => "LIGHT_PURPLE",
            TextColor::Yellow => "YELLOW",
            TextColor::White => "WHITE",
            TextColor::Reset => "RESET",
        }
    }

    /// Look a color up by registry name, ignoring case.
    ///
    /// Returns `None` for anything outside the palette; callers decide
    /// whether that matters.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_uppercase();
        Self::ALL.iter().copied().find(|c| c.name() == wanted)
    }

    /// Formatting code character (`0`-`f`), if the color has one
    pub fn code(&self) -> Option<char> {
        let code = match self {
            TextColor::Black => '0',
            TextColor::DarkBlue => '1',
            TextColor::DarkGreen => '2',
            TextColor::DarkAqua => '3',
            TextColor::DarkRed => '4',
            TextColor::DarkPurple => '5',
            TextColor::Gold => '6',
            TextColor::Gray => '7',
            TextColor::DarkGray => '8',
            TextColor::Blue => '9',
            TextColor::Green => 'a',
            TextColor::Aqua => 'b',
            TextColor::Red => 'c',
            TextColor::LightPurple => 'd',
            TextColor::Yellow => 'e',
            TextColor::White => 'f',
            TextColor::Reset => return None,
        };
        Some(code)
    }

    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|c| c.code() == Some(code))
    }

    /// RGB value used when printing to a truecolor terminal
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            TextColor::Black => (0, 0, 0),
            TextColor::DarkBlue => (0, 0, 170),
            TextColor::DarkGreen => (0, 170, 0),
            TextColor::DarkAqua => (0, 170, 170),
            TextColor::DarkRed => (170, 0, 0),
            TextColor::DarkPurple => (170, 0, 170),
            TextColor::Gold => (255, 170, 0),
            TextColor::Gray => (170, 170, 170),
            TextColor::DarkGray => (85, 85, 85),
            TextColor::Blue => (85, 85, 255),
            TextColor::Green => (85, 255, 85),
            TextColor::Aqua => (85, 255, 255),
            TextColor::Red => (255, 85, 85),
            TextColor::LightPurple => (255, 85, 255),
            TextColor::Yellow => (255, 255, 85),
            TextColor::White | TextColor::Reset => (255, 255, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(TextColor::from_name("green"), Some(TextColor::Green));
        assert_eq!(TextColor::from_name("Dark_Aqua"), Some(TextColor::DarkAqua));
        assert_eq!(TextColor::from_name("LIGHT_PURPLE"), Some(TextColor::LightPurple));
    }

    #[test]
    fn test_unknown_name_is_absent() {
        assert_eq!(TextColor::from_name("chartreuse"), None);
        assert_eq!(TextColor::from_name(""), None);
    }

    #[test]
    fn test_codes_round_through_palette() {
        assert_eq!(TextColor::from_code('c'), Some(TextColor::Red));
        assert_eq!(TextColor::from_code('A'), Some(TextColor::Green));
        assert_eq!(TextColor::from_code('z'), None);
        assert_eq!(TextColor::Reset.code(), None);
    }
}
