//! Command-line arguments

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Long flags also accepted with a single dash (`-check`, `-build`, ...)
const SINGLE_DASH_FLAGS: &[&str] = &["check", "build", "pull", "push"];

/// Check a container image for pending distribution package upgrades
#[derive(Parser, Debug)]
#[command(name = "duuh", version, about)]
pub struct Args {
    /// Image to check, e.g. `alpine:3.18`
    #[arg(required_unless_present = "check")]
    pub image: Option<String>,

    /// Rebuild and re-tag the image when upgrades are found
    #[arg(long)]
    pub build: bool,

    /// Pull the image from its registry before checking
    #[arg(long)]
    pub pull: bool,

    /// Push the image to its registry after rebuilding
    #[arg(long)]
    pub push: bool,

    /// Check the current filesystem and print the report as JSON (internal use)
    #[arg(long, conflicts_with_all = ["build", "pull", "push"])]
    pub check: bool,

    /// Time limit in seconds for each external command, 0 disables it
    #[arg(long, value_name = "SECS")]
    pub command_timeout: Option<u64>,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Container runtime binary
    #[arg(long, value_name = "BIN")]
    pub runtime: Option<String>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Rewrite single-dash long flags to their double-dash form
///
/// Arguments after a bare `--` are left alone.
pub fn normalize_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut positional_only = false;
    args.into_iter()
        .map(|arg| {
            if positional_only {
                return arg;
            }
            if arg == "--" {
                positional_only = true;
                return arg;
            }
            match arg.to_str().and_then(|s| s.strip_prefix('-')) {
                Some(name) if SINGLE_DASH_FLAGS.contains(&name) => {
                    OsString::from(format!("--{name}"))
                }
                _ => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(normalize_flags(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_normalize_flags() {
        let args = normalize_flags(
            ["duuh", "-check", "-v", "--pull", "-push", "--", "-build"]
                .into_iter()
                .map(OsString::from),
        );

        assert_eq!(
            args,
            ["duuh", "--check", "-v", "--pull", "--push", "--", "-build"]
        );
    }

    #[test]
    fn test_go_style_flags() {
        let args = parse(&["duuh", "-build", "-pull", "-push", "nginx:1.25"]).unwrap();

        assert!(args.build && args.pull && args.push);
        assert_eq!(args.image.as_deref(), Some("nginx:1.25"));
    }

    #[test]
    fn test_image_required_outside_check_mode() {
        assert!(parse(&["duuh"]).is_err());
        assert!(parse(&["duuh", "--build"]).is_err());

        let args = parse(&["duuh", "-check", "--command-timeout", "60"]).unwrap();
        assert!(args.check);
        assert_eq!(args.image, None);
        assert_eq!(args.command_timeout, Some(60));
    }

    #[test]
    fn test_check_conflicts_with_build() {
        assert!(parse(&["duuh", "--check", "--build"]).is_err());
    }
}
