//! Colour palette and its `theme.conf` persistence.
//!
use ratatui::style::Color;
use std::path::Path;

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub card_open: Color,
    pub editing: Color,
    pub error: Color,
}

const KEYS: [&str; 12] = [
    "text",
    "muted",
    "title",
    "border",
    "header_bg",
    "header_fg",
    "status_bg",
    "status_fg",
    "highlight_fg",
    "card_open",
    "editing",
    "error",
];

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            card_open: Color::Rgb(0xa6, 0xe3, 0xa1),    // green
            editing: Color::Rgb(0xf5, 0xc2, 0xe7),      // pink
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "card_open" => &mut self.card_open,
            "editing" => &mut self.editing,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    fn get(&self, key: &str) -> Color {
        let mut copy = *self;
        copy.slot(key).map(|c| *c).unwrap_or(Color::Reset)
    }

    /// Parse `key = value` lines. Unknown keys and bad colours are skipped and
    /// keep their `mocha` value.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            match (theme.slot(key), parse_color(val)) {
                (Some(slot), Some(color)) => *slot = color,
                _ => tracing::debug!(line = raw_line, "ignoring theme entry"),
            }
        }
        theme
    }

    /// Load theme from a key=value file.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# celeb-directory theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        for key in KEYS {
            let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(self.get(key)));
        }
        std::fs::write(path, buf)
    }

    /// Load from `path`, or write the defaults there when it does not exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        // Palettes only hold RGB values or Reset
        _ => "reset".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overrides_known_keys_only() {
        let t = Theme::parse(
            "# c\ntitle = #010203\nbogus = #FFFFFF\nborder = nothex\nerror=reset\n",
        );
        assert_eq!(t.title, Color::Rgb(1, 2, 3));
        assert_eq!(t.border, Theme::mocha().border);
        assert_eq!(t.error, Color::Reset);
    }

    #[test]
    fn parse_color_accepts_bare_hex() {
        assert_eq!(parse_color("ff0080"), Some(Color::Rgb(0xff, 0x00, 0x80)));
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn written_file_parses_back_to_same_palette() {
        let mut t = Theme::mocha();
        t.error = Color::Reset;
        let path = std::env::temp_dir().join(format!("celeb_theme_rt_{}.conf", std::process::id()));
        t.write_file(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(contents.contains("error = reset"));
        assert_eq!(Theme::parse(&contents), t);
    }
}
