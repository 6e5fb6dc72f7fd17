use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::media::subtitles::validate_srt;
use crate::media::{BurnError, BurnJob};

use super::options::FfmpegOptions;

#[derive(Parser, Debug)]
pub struct BurnCommand {
    /// Input video file
    pub video: PathBuf,

    /// SRT subtitle file
    pub srt: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "video_with_subs.mp4")]
    pub output: PathBuf,

    #[command(flatten)]
    pub ffmpeg: FfmpegOptions,
}

impl BurnCommand {
    pub async fn run(self) -> Result<()> {
        if !self.video.is_file() {
            bail!("video file not found: {}", self.video.display());
        }

        let subtitles = tokio::fs::read(&self.srt)
            .await
            .with_context(|| format!("failed to read {}", self.srt.display()))?;
        let cues = validate_srt(&subtitles)
            .with_context(|| format!("invalid subtitles in {}", self.srt.display()))?;

        println!(
            "Burning {} cue(s) from {} into {}",
            cues,
            self.srt.display(),
            self.video.display()
        );

        let settings = self.ffmpeg.settings();
        let job = BurnJob {
            input: self.video,
            subtitles: self.srt,
            output: self.output,
        };

        let started = Instant::now();
        match settings.burn(&job).await {
            Ok(_) => {
                println!(
                    "Wrote {} in {:.1}s",
                    job.output.display(),
                    started.elapsed().as_secs_f64()
                );
                Ok(())
            }
            Err(BurnError::Failed { code, stderr, .. }) => {
                eprintln!("{}", stderr.trim_end());
                bail!("ffmpeg failed (exit code {:?})", code);
            }
            Err(e) => Err(e.into()),
        }
    }
}
