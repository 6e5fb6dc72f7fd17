use thiserror::Error;

/**
    Error returned when a colour given on the command line cannot be
    turned into an ASS colour literal.
*/
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour '{0}', expected six hex digits (e.g. ffffff)")]
pub struct StyleError(pub String);

/**
    ASS style overrides passed to the ffmpeg `subtitles` filter
    through its `force_style` option.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleStyle {
    pub font_size: u32,
    /// ASS colour literal, e.g. `&Hffffff&`
    pub primary_colour: String,
    /// ASS colour literal, e.g. `&H000000&`
    pub outline_colour: String,
    pub outline: u32,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: 24,
            primary_colour: "&Hffffff&".to_string(),
            outline_colour: "&H000000&".to_string(),
            outline: 2,
        }
    }
}

impl SubtitleStyle {
    /**
        Render the overrides in the comma separated form ffmpeg expects.
    */
    pub fn force_style(&self) -> String {
        format!(
            "FontSize={},PrimaryColour={},OutlineColour={},Outline={}",
            self.font_size, self.primary_colour, self.outline_colour, self.outline
        )
    }
}

/**
    Parse a colour into an ASS colour literal.

    Accepts `ffffff`, `#ffffff` and `&Hffffff&`. The hex digits are passed
    through as given, ASS itself reads them in BGR order.
*/
pub fn parse_colour(s: &str) -> Result<String, StyleError> {
    let trimmed = s.trim();
    let hex = trimmed
        .strip_prefix("&H")
        .and_then(|rest| rest.strip_suffix('&'))
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(StyleError(s.to_string()));
    }

    Ok(format!("&H{}&", hex.to_ascii_lowercase()))
}
