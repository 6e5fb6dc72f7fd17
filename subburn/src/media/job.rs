use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::ffmpeg::BurnJob;

const SUBTITLES_FILENAME: &str = "subtitles.srt";
const OUTPUT_FILENAME: &str = "output.mp4";

/**
    Scratch directory holding the files of one burn.

    Everything inside is removed from disk when the `JobDir` is dropped,
    so a request that fails halfway never leaves uploads behind.
*/
#[derive(Debug)]
pub struct JobDir {
    dir: TempDir,
    input_filename: String,
}

impl JobDir {
    /**
        Create a fresh directory. `input_extension` names the uploaded
        video file so ffmpeg sees a familiar suffix.
    */
    pub fn new(input_extension: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("subburn-").tempdir()?;
        Ok(Self {
            dir,
            input_filename: format!("input.{input_extension}"),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join(&self.input_filename)
    }

    pub fn subtitles_path(&self) -> PathBuf {
        self.dir.path().join(SUBTITLES_FILENAME)
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_FILENAME)
    }

    pub fn job(&self) -> BurnJob {
        BurnJob {
            input: self.input_path(),
            subtitles: self.subtitles_path(),
            output: self.output_path(),
        }
    }
}

/**
    Pick an extension for an uploaded video from its client-supplied
    filename. Anything unusual falls back to `mp4`.
*/
pub fn sanitize_extension(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5)
        .filter(|ext| ext.bytes().all(|b| b.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "mp4".to_string())
}
