//! provision CLI - create volumes and buckets from positional arguments.
//!
//! Each extra argument extends the previous command line:
//!
//! ```text
//! provision volume <volume> [<quota> [<owner> [<acl>]]]
//! provision bucket <volume> <bucket> [<storage tier> [<versioning> [<acl>]]]
//! ```
//!
//! Values may start with `-` (`-5 GB` is passed on and rejected as a quota),
//! so options go before the values: `provision --dry-run volume vol1`.
//!
//! Exit status is `0` on success and `1` on any failure. A wrong argument
//! count also prints usage to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use provision_core::{
    LocalStoreClient, ProvisionError, Provisioner, ResourceKind, classify, resolve_request,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "provision")]
#[command(version, about = "Create storage volumes and buckets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Root directory of the local store (also: PROVISION_STORE)
    #[arg(long, global = true, env = "PROVISION_STORE", default_value = ".provision")]
    store: PathBuf,

    /// Print the resolved request as JSON instead of creating anything
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a volume: <volume> [<quota> [<owner> [<acl>]]]
    Volume {
        #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Create a bucket: <volume> <bucket> [<storage tier> [<versioning> [<acl>]]]
    Bucket {
        #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },
}

impl Command {
    fn kind(&self) -> ResourceKind {
        match self {
            Command::Volume { .. } => ResourceKind::Volume,
            Command::Bucket { .. } => ResourceKind::Bucket,
        }
    }

    fn args(&self) -> &[String] {
        match self {
            Command::Volume { args } | Command::Bucket { args } => args,
        }
    }
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn usage(kind: ResourceKind) -> String {
    let (synopsis, examples): (&str, &[&str]) = match kind {
        ResourceKind::Volume => (
            "provision volume <volume> [<quota> [<owner> [<acl>]]]",
            &[
                "provision volume foo",
                "provision volume foo \"50 GB\"",
                "provision volume foo \"50 GB\" dr.strange",
                "provision volume foo \"50 GB\" dr.strange user:dr.who:rw",
            ],
        ),
        ResourceKind::Bucket => (
            "provision bucket <volume> <bucket> [<storage tier> [<versioning> [<acl>]]]",
            &[
                "provision bucket foo bar",
                "provision bucket foo bar SSD",
                "provision bucket foo bar SSD true",
                "provision bucket foo bar SSD true user:dr.who:rw",
            ],
        ),
    };

    let mut text = format!("Usage: {synopsis}\nExamples:\n");
    for example in examples {
        text.push_str("  ");
        text.push_str(example);
        text.push('\n');
    }
    text
}

fn run(cli: &Cli) -> Result<()> {
    let kind = cli.command.kind();
    let args = classify(kind, cli.command.args())?;
    let request = resolve_request(&args)?;

    if cli.dry_run {
        let json = serde_json::to_string_pretty(&request)
            .context("Failed to serialize resolved request")?;
        println!("{json}");
        return Ok(());
    }

    debug!(store = %cli.store.display(), "using local store");
    let provisioner = Provisioner::new(LocalStoreClient::new(&cli.store));
    provisioner.provision_request(&request)?;
    println!("Created {kind} {}", request.identity);
    Ok(())
}

/// Help and version requests are the only parse outcomes that succeed.
fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if is_informational(&err) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(arity @ ProvisionError::Arity { .. }) = err.downcast_ref::<ProvisionError>() {
                eprintln!("Invalid argument: {arity}");
                eprint!("{}", usage(cli.command.kind()));
            } else {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_args_are_collected() {
        let cli = Cli::try_parse_from([
            "provision", "bucket", "vol1", "b1", "SSD", "true", "user:bob:r",
        ])
        .unwrap();
        assert_eq!(cli.command.kind(), ResourceKind::Bucket);
        assert_eq!(cli.command.args(), ["vol1", "b1", "SSD", "true", "user:bob:r"]);
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["provision", "--dry-run", "--store", "/tmp/s", "volume", "vol1"])
            .unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.store, PathBuf::from("/tmp/s"));
        assert_eq!(cli.command.args(), ["vol1"]);
    }

    #[test]
    fn test_hyphenated_values_reach_the_resolver() {
        let cli = Cli::try_parse_from(["provision", "volume", "vol1", "-5 GB"]).unwrap();
        assert_eq!(cli.command.args(), ["vol1", "-5 GB"]);

        let err = run(&cli).unwrap_err();
        match err.downcast_ref::<ProvisionError>() {
            Some(ProvisionError::Configuration { field, value, .. }) => {
                assert_eq!(field, "quota");
                assert_eq!(value, "-5 GB");
            }
            other => panic!("Expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_hyphenated_owner_is_kept() {
        let cli = Cli::try_parse_from(["provision", "volume", "vol1", "1 GB", "-alice"]).unwrap();
        assert_eq!(cli.command.args(), ["vol1", "1 GB", "-alice"]);
    }

    #[test]
    fn test_missing_subcommand_is_a_failure() {
        let err = Cli::try_parse_from(["provision"]).unwrap_err();
        assert!(!is_informational(&err));
    }

    #[test]
    fn test_help_is_informational() {
        let err = Cli::try_parse_from(["provision", "--help"]).unwrap_err();
        assert!(is_informational(&err));
    }

    #[test]
    fn test_wrong_count_is_reported_as_arity() {
        let cli = Cli::try_parse_from(["provision", "bucket", "vol1"]).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProvisionError>(),
            Some(ProvisionError::Arity { got: 1, .. })
        ));
    }

    #[test]
    fn test_usage_lists_every_rung() {
        let text = usage(ResourceKind::Volume);
        assert!(text.starts_with("Usage: provision volume"));
        assert_eq!(text.lines().filter(|l| l.starts_with("  ")).count(), 4);
    }
}
