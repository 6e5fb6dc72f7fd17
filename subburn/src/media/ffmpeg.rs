use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use super::style::SubtitleStyle;

/**
    How long `ffmpeg -version` may take before we give up on it.
*/
const VERSION_TIMEOUT: Duration = Duration::from_secs(10);

/**
    Errors from running ffmpeg.
*/
#[derive(Debug, Error)]
pub enum BurnError {
    /// ffmpeg could not be started at all (missing binary, permissions)
    #[error("failed to execute ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),

    /// Reading the child's output or waiting on it failed
    #[error("ffmpeg i/o error: {0}")]
    Io(#[source] std::io::Error),

    /// ffmpeg was killed after running past the configured timeout
    #[error("ffmpeg timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// ffmpeg ran but exited unsuccessfully
    #[error("ffmpeg exited with code {}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

/**
    Captured output of a finished child process.
*/
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/**
    The three files involved in a single burn.
*/
#[derive(Debug, Clone)]
pub struct BurnJob {
    pub input: PathBuf,
    pub subtitles: PathBuf,
    pub output: PathBuf,
}

/**
    Everything needed to turn a `BurnJob` into an ffmpeg invocation.
*/
#[derive(Debug, Clone)]
pub struct BurnSettings {
    pub ffmpeg: PathBuf,
    pub video_codec: String,
    pub preset: String,
    pub style: SubtitleStyle,
    pub timeout: Duration,
}

impl Default for BurnSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
            style: SubtitleStyle::default(),
            timeout: Duration::from_secs(1800),
        }
    }
}

impl BurnSettings {
    /**
        Build the `subtitles` filter expression for the given subtitle file.
    */
    pub fn subtitles_filter(&self, subtitles: &Path) -> String {
        format!(
            "subtitles={}:force_style='{}'",
            escape_filter_value(&subtitles.to_string_lossy()),
            self.style.force_style()
        )
    }

    /**
        Arguments passed to ffmpeg for a job. Audio is copied untouched,
        video is re-encoded with the subtitles rendered into the frames.
    */
    pub fn args(&self, job: &BurnJob) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            job.input.clone().into_os_string(),
            "-vf".into(),
            self.subtitles_filter(&job.subtitles).into(),
            "-c:a".into(),
            "copy".into(),
            "-c:v".into(),
            self.video_codec.clone().into(),
            "-preset".into(),
            self.preset.clone().into(),
            job.output.clone().into_os_string(),
        ]
    }

    /**
        Run ffmpeg for a job, waiting at most `self.timeout`.
    */
    pub async fn burn(&self, job: &BurnJob) -> Result<ProcessOutput, BurnError> {
        let mut command = Command::new(&self.ffmpeg);
        command.args(self.args(job));

        tracing::debug!(ffmpeg = %self.ffmpeg.display(), input = %job.input.display(), "running ffmpeg");

        let output = run_process(command, self.timeout).await?;
        if !output.status.success() {
            return Err(BurnError::Failed {
                code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }

    /**
        Return the first line of `ffmpeg -version`, proving the binary is
        installed and runnable.
    */
    pub async fn version(&self) -> Result<String, BurnError> {
        let mut command = Command::new(&self.ffmpeg);
        command.arg("-version");

        let output = run_process(command, VERSION_TIMEOUT).await?;
        if !output.status.success() {
            return Err(BurnError::Failed {
                code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(output.stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}

/**
    Spawn a command and collect its output, killing it if it runs longer
    than `timeout`.
*/
pub async fn run_process(mut command: Command, timeout: Duration) -> Result<ProcessOutput, BurnError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(BurnError::Spawn)?;

    // Dropping the wait future drops the child, which kills it.
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Err(_) => Err(BurnError::Timeout(timeout)),
        Ok(Err(e)) => Err(BurnError::Io(e)),
        Ok(Ok(output)) => Ok(ProcessOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
    }
}

/**
    Escape a value for use as a filter option inside an ffmpeg filtergraph.

    Two levels apply: the option value itself (`\ ' :`) and then the
    filtergraph description (`\ ' [ ] , ;`).
*/
pub fn escape_filter_value(value: &str) -> String {
    let option_level = escape_chars(value, &['\\', '\'', ':']);
    escape_chars(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

fn escape_chars(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
