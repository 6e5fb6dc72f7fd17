use anyhow::Result;
use clap::{Parser, Subcommand};

mod burn;
mod check;
mod options;
mod serve;

pub use burn::BurnCommand;
pub use check::CheckCommand;
pub use serve::ServeCommand;

#[derive(Parser, Debug)]
#[command(name = "subburn")]
#[command(about = "HTTP service that burns SRT subtitles into videos with ffmpeg")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve(ServeCommand),
    /// Burn subtitles into a local video file
    Burn(BurnCommand),
    /// Check that ffmpeg is installed and runnable
    Check(CheckCommand),
}

impl Args {
    /**
        The command to run. Without a subcommand, `serve` is parsed from an
        empty argument list so its environment fallbacks still apply.
    */
    pub fn into_command(self) -> Result<Command> {
        match self.command {
            Some(command) => Ok(command),
            None => Ok(Command::Serve(ServeCommand::try_parse_from(["subburn"])?)),
        }
    }

    pub async fn run(self) -> Result<()> {
        match self.into_command()? {
            Command::Serve(cmd) => cmd.run().await,
            Command::Burn(cmd) => cmd.run().await,
            Command::Check(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::CommandFactory;

    use super::*;
    use crate::media::BurnSettings;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let args = Args::try_parse_from(["subburn"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn serve_flags() {
        let args = Args::try_parse_from([
            "subburn",
            "serve",
            "--port",
            "8080",
            "--max-jobs",
            "3",
            "--preset",
            "slow",
            "--primary-colour",
            "#FFFF00",
            "--timeout",
            "1800",
        ])
        .unwrap();

        let Some(Command::Serve(cmd)) = args.command else {
            panic!("expected serve");
        };
        assert_eq!(cmd.port, 8080);
        assert_eq!(cmd.max_jobs, 3);

        let settings = cmd.ffmpeg.settings();
        assert_eq!(settings.preset, "slow");
        assert_eq!(settings.style.primary_colour, "&Hffff00&");
        assert_eq!(settings.style.outline_colour, "&H000000&");
        assert_eq!(settings.timeout, Duration::from_secs(1800));
    }

    #[test]
    fn serve_port_defaults_to_8080() {
        let command = ServeCommand::command();
        let port = command
            .get_arguments()
            .find(|arg| arg.get_id() == "port")
            .unwrap();
        let defaults: Vec<_> = port.get_default_values().iter().map(|v| v.to_str()).collect();
        assert_eq!(defaults, [Some("8080")]);
    }

    #[test]
    fn bad_colour_is_rejected() {
        let result = Args::try_parse_from(["subburn", "serve", "--outline-colour", "blue"]);
        assert!(result.is_err());
    }

    #[test]
    fn burn_positional_args() {
        let args =
            Args::try_parse_from(["subburn", "burn", "in.mp4", "subs.srt", "-o", "out.mp4"])
                .unwrap();

        let Some(Command::Burn(cmd)) = args.command else {
            panic!("expected burn");
        };
        assert_eq!(cmd.video.to_str(), Some("in.mp4"));
        assert_eq!(cmd.srt.to_str(), Some("subs.srt"));
        assert_eq!(cmd.output.to_str(), Some("out.mp4"));
    }

    #[test]
    fn default_options_match_burn_defaults() {
        // Only options without an environment fallback are compared.
        let parsed = Args::try_parse_from(["subburn", "serve"]).unwrap();
        let Some(Command::Serve(cmd)) = parsed.command else {
            panic!("expected serve");
        };
        let settings = cmd.ffmpeg.settings();
        let defaults = BurnSettings::default();

        assert_eq!(settings.video_codec, defaults.video_codec);
        assert_eq!(settings.preset, defaults.preset);
        assert_eq!(settings.style, defaults.style);
    }

    #[test]
    fn bare_invocation_reads_environment() {
        // No other test asserts on the PORT or SUBBURN_MAX_JOBS values.
        unsafe {
            std::env::set_var("PORT", "9099");
            std::env::set_var("SUBBURN_MAX_JOBS", "4");
        }

        let command = Args::try_parse_from(["subburn"])
            .unwrap()
            .into_command()
            .unwrap();

        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("SUBBURN_MAX_JOBS");
        }

        let Command::Serve(cmd) = command else {
            panic!("expected serve");
        };
        assert_eq!(cmd.port, 9099);
        assert_eq!(cmd.max_jobs, 4);
    }
}
