use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::media::BurnSettings;

#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Path to the ffmpeg binary
    #[arg(long, env = "FFMPEG_PATH", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,
}

impl CheckCommand {
    pub async fn run(self) -> Result<()> {
        let settings = BurnSettings {
            ffmpeg: self.ffmpeg,
            ..BurnSettings::default()
        };

        let version = settings
            .version()
            .await
            .with_context(|| format!("ffmpeg not usable at {}", settings.ffmpeg.display()))?;

        println!("{}", version);
        Ok(())
    }
}
