use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::media::style::parse_colour;
use crate::media::{BurnSettings, SubtitleStyle};

/**
    ffmpeg options shared by every command that burns subtitles.
*/
#[derive(Args, Debug, Clone)]
pub struct FfmpegOptions {
    /// Path to the ffmpeg binary
    #[arg(long, env = "FFMPEG_PATH", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Video encoder used for the output
    #[arg(long, default_value = "libx264")]
    pub video_codec: String,

    /// Encoder preset
    #[arg(long, default_value = "fast")]
    pub preset: String,

    /// Subtitle font size
    #[arg(long, default_value = "24")]
    pub font_size: u32,

    /// Subtitle text colour (six hex digits)
    #[arg(long, default_value = "ffffff", value_parser = parse_colour)]
    pub primary_colour: String,

    /// Subtitle outline colour (six hex digits)
    #[arg(long, default_value = "000000", value_parser = parse_colour)]
    pub outline_colour: String,

    /// Subtitle outline width
    #[arg(long, default_value = "2")]
    pub outline: u32,

    /// Maximum ffmpeg run time in seconds
    #[arg(long, env = "SUBBURN_TIMEOUT", default_value = "1800")]
    pub timeout: u64,
}

impl FfmpegOptions {
    pub fn settings(&self) -> BurnSettings {
        BurnSettings {
            ffmpeg: self.ffmpeg.clone(),
            video_codec: self.video_codec.clone(),
            preset: self.preset.clone(),
            style: SubtitleStyle {
                font_size: self.font_size,
                primary_colour: self.primary_colour.clone(),
                outline_colour: self.outline_colour.clone(),
                outline: self.outline,
            },
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
