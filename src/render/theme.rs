use ratatui::style::Color;

/// Color palette for window chrome and controls. A plain value passed into
/// the draw call; embedders swap fields rather than subclassing anything.
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg_surface: Color,
    pub border_primary: Color,
    pub border_secondary: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub accent_primary: Color,
    pub accent_secondary: Color,
    pub accent_error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg_surface: Color::Rgb(30, 30, 46),
            border_primary: Color::Rgb(137, 180, 250),
            border_secondary: Color::Rgb(88, 91, 112),
            text_primary: Color::Rgb(205, 214, 244),
            text_secondary: Color::Rgb(166, 173, 200),
            accent_primary: Color::Rgb(137, 180, 250),
            accent_secondary: Color::Rgb(250, 179, 135),
            accent_error: Color::Rgb(243, 139, 168),
        }
    }
}

/// Parse a `#rgb` or `#rrggbb` string into a terminal color. Used for the
/// swatch next to color inputs; invalid strings yield `None` and the
/// swatch is skipped.
pub fn parse_hex_color(text: &str) -> Option<Color> {
    let hex = text.strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
            (digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            (byte(0)?, byte(2)?, byte(4)?)
        }
        _ => return None,
    };
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ffffff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#102030"), Some(Color::Rgb(16, 32, 48)));
        assert_eq!(parse_hex_color("102030"), None);
        assert_eq!(parse_hex_color("#12"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }
}
