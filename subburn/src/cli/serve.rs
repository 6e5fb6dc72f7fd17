use std::net::{IpAddr, SocketAddr};

use anyhow::{Result, anyhow};
use clap::Parser;
use tokio::{signal, sync::watch};

use crate::server::AppState;

use super::options::FfmpegOptions;

#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(long, env = "SUBBURN_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// HTTP server port
    #[arg(short, long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Number of ffmpeg processes allowed to run at once
    #[arg(long, env = "SUBBURN_MAX_JOBS", default_value = "1")]
    pub max_jobs: usize,

    /// Maximum request body size in MiB
    #[arg(long, env = "SUBBURN_MAX_UPLOAD_MB", default_value = "2048")]
    pub max_upload_mb: usize,

    #[command(flatten)]
    pub ffmpeg: FfmpegOptions,
}

impl ServeCommand {
    pub async fn run(self) -> Result<()> {
        let settings = self.ffmpeg.settings();

        // Not fatal, the service still answers health checks without ffmpeg.
        match settings.version().await {
            Ok(version) => tracing::info!("using {}", version),
            Err(e) => tracing::warn!(ffmpeg = %settings.ffmpeg.display(), "ffmpeg unavailable: {}", e),
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let state = AppState::new(settings, self.max_jobs);
        let addr = SocketAddr::new(self.host, self.port);
        let max_upload_bytes = self.max_upload_mb.saturating_mul(1024 * 1024);

        tracing::info!(
            max_jobs = self.max_jobs,
            max_upload_mb = self.max_upload_mb,
            "starting subtitle burner on http://{}",
            addr
        );

        let mut server_handle = tokio::spawn(crate::server::run_server(
            addr,
            state,
            max_upload_bytes,
            shutdown_rx,
        ));

        tokio::select! {
            result = &mut server_handle => {
                // The server only returns early if it could not start.
                return match result {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(anyhow!("server error: {e}")),
                    Err(e) => Err(anyhow!("server task failed: {e}")),
                };
            }
            result = signal::ctrl_c() => {
                result?;
            }
        }

        tracing::info!("shutting down");
        let _ = shutdown_tx.send(true);

        match server_handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("server error during shutdown: {}", e),
            Err(e) => tracing::error!("server task failed: {}", e),
        }

        tracing::info!("done");
        Ok(())
    }
}
