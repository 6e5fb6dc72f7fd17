pub mod ffmpeg;
pub mod job;
pub mod style;
pub mod subtitles;

pub use ffmpeg::{BurnError, BurnJob, BurnSettings};
pub use job::JobDir;
pub use style::SubtitleStyle;
