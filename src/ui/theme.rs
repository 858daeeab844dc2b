use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub border: Color,
    pub title: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub statusbar_bg: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub gauge_unfilled: Color,
    pub rx_color: Color,
    pub tx_color: Color,
    /// Low, warning and critical utilization.
    pub heat_colors: [Color; 3],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn from_config(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            "mono" | "monochrome" => Self::mono(),
            _ => Self::dark(),
        }
    }

    /// Green under 50 %, yellow under 80 %, red above.
    pub fn heat(&self, percent: f64) -> Color {
        if percent < 50.0 {
            self.heat_colors[0]
        } else if percent < 80.0 {
            self.heat_colors[1]
        } else {
            self.heat_colors[2]
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            border: Color::DarkGray,
            title: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            statusbar_bg: Color::DarkGray,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            gauge_unfilled: Color::DarkGray,
            rx_color: Color::Rgb(103, 232, 249),
            tx_color: Color::Rgb(251, 146, 60),
            heat_colors: [
                Color::Rgb(16, 185, 129),
                Color::Rgb(234, 179, 8),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            border: Color::Gray,
            title: Color::DarkGray,
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            statusbar_bg: Color::Gray,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            surface_bg: Color::Gray,
            gauge_unfilled: Color::Gray,
            rx_color: Color::Rgb(2, 132, 199),
            tx_color: Color::Rgb(194, 65, 12),
            heat_colors: [
                Color::Rgb(21, 128, 61),
                Color::Rgb(161, 98, 7),
                Color::Rgb(185, 28, 28),
            ],
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::White,
            header_accent_fg: Color::Black,
            border: Color::Gray,
            title: Color::White,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            statusbar_bg: Color::Reset,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::Reset,
            gauge_unfilled: Color::Reset,
            rx_color: Color::White,
            tx_color: Color::White,
            heat_colors: [Color::White, Color::White, Color::White],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_dark() {
        assert_eq!(Theme::from_config("solarized").name, "dark");
        assert_eq!(Theme::from_config("LIGHT").name, "light");
        assert_eq!(Theme::from_config("monochrome").name, "mono");
    }

    #[test]
    fn heat_thresholds() {
        let theme = Theme::dark();
        assert_eq!(theme.heat(10.0), theme.heat_colors[0]);
        assert_eq!(theme.heat(50.0), theme.heat_colors[1]);
        assert_eq!(theme.heat(79.9), theme.heat_colors[1]);
        assert_eq!(theme.heat(80.0), theme.heat_colors[2]);
    }
}
