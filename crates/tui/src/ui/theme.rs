use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface_bright: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub border_focused: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface_bright: Color::Rgb(20, 26, 32),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(160, 160, 160),
            dim: Color::Rgb(120, 120, 120),
            accent: Color::Rgb(80, 160, 160),
            border: Color::Rgb(60, 68, 76),
            border_focused: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(16, 185, 129),
            negative: Color::Rgb(239, 68, 68),
            warning: Color::Rgb(245, 158, 11),
            error: Color::Rgb(200, 80, 80),
        }
    }
}

/// Terminal color of a stored `#rrggbb` category color. Anything else
/// renders as gray.
pub fn hex_color(value: &str) -> Color {
    let Some(hex) = value.strip_prefix('#').filter(|hex| hex.len() == 6) else {
        return Color::Gray;
    };
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_colors() {
        assert_eq!(hex_color("#3b82f6"), Color::Rgb(0x3b, 0x82, 0xf6));
        assert_eq!(hex_color("#FFFFFF"), Color::Rgb(255, 255, 255));
        assert_eq!(hex_color("blue"), Color::Gray);
        assert_eq!(hex_color("#12345z"), Color::Gray);
        assert_eq!(hex_color("#ééé"), Color::Gray);
    }
}
