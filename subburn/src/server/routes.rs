use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Multipart, State, multipart::Field},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::media::JobDir;
use crate::media::job::sanitize_extension;
use crate::media::subtitles::validate_srt;

use super::AppState;
use super::error::ApiError;

const DOWNLOAD_FILENAME: &str = "video_with_subs.mp4";

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// Root endpoint, describes the service.
pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "online",
        "service": "ffmpeg-subtitle-burner",
        "endpoints": {
            "burn-subtitles": "POST /burn-subtitles (multipart/video, multipart/srt)",
            "health": "GET /health",
        },
    }))
}

/// Liveness check.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/**
    Burn the uploaded `srt` file into the uploaded `video` file and return
    the re-encoded MP4 as an attachment.
*/
pub async fn burn_subtitles(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let job_id = NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed);

    let mut job_dir: Option<JobDir> = None;
    let mut srt: Option<Bytes> = None;

    // Both parts must be file uploads; plain form values fall through and are drained.
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" if job_dir.is_none() && field.file_name().is_some() => {
                let dir = JobDir::new(&sanitize_extension(field.file_name()))?;
                tracing::debug!(job = job_id, dir = %dir.path().display(), "created job directory");
                let written = save_field(field, &dir.input_path()).await?;
                tracing::info!(job = job_id, bytes = written, "received video");
                job_dir = Some(dir);
            }
            "srt" if srt.is_none() && field.file_name().is_some() => {
                let data = field.bytes().await?;
                tracing::info!(job = job_id, bytes = data.len(), "received subtitles");
                srt = Some(data);
            }
            _ => {
                tracing::debug!(job = job_id, field = %name, "ignoring upload field");
            }
        }
    }

    let (Some(job_dir), Some(srt)) = (job_dir, srt) else {
        return Err(ApiError::MissingFiles);
    };

    let cues = validate_srt(&srt)?;
    tokio::fs::write(job_dir.subtitles_path(), &srt).await?;

    let _permit = state
        .jobs
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ApiError::Internal("job queue closed".to_string()))?;

    tracing::info!(job = job_id, cues, "burning subtitles");
    let started = Instant::now();

    if let Err(e) = state.settings.burn(&job_dir.job()).await {
        tracing::warn!(job = job_id, elapsed = ?started.elapsed(), "burn failed: {}", e);
        return Err(e.into());
    }

    tracing::info!(job = job_id, elapsed = ?started.elapsed(), "burn finished");

    video_response(job_dir).await
}

/// Stream a multipart field to a file, returning the number of bytes written.
async fn save_field(mut field: Field<'_>, path: &Path) -> Result<u64, ApiError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;

    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

/**
    Build the download response for a finished job. The job directory is
    moved into the body stream and removed once the body is dropped.
*/
pub async fn video_response(job_dir: JobDir) -> Result<Response, ApiError> {
    let file = tokio::fs::File::open(job_dir.output_path()).await?;
    let len = file.metadata().await?.len();

    let stream = ReaderStream::new(file).map(move |chunk| {
        let _job_dir = &job_dir;
        chunk
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
        )
        .header(header::CONTENT_LENGTH, len)
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
