//! cstore-query — query the configuration store from the command line.
//!
//! Predicates (`exists`, `is-tag`, ...) print nothing and report through the
//! exit status: 0 for true, 1 for false. Value and list commands print to
//! stdout; errors go to stderr with exit status 1.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cstore_query::{split_quoted, ClientConfig, ConfigQueryClient};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "cstore-query.toml";

/// cstore-query — query the cli-shell-api configuration store.
#[derive(Parser)]
#[command(
    name = "cstore-query",
    version,
    about = "cstore-query — query the cli-shell-api configuration store"
)]
struct Cli {
    /// Path to config file [default: ./cstore-query.toml or ~/.config/cstore-query/cstore-query.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Override the configured cli-shell-api executable
    #[arg(long, global = true)]
    executable: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Config path as trailing words, e.g. `interfaces ethernet eth0`.
#[derive(Args)]
struct PathArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    path: Vec<String>,
}

impl PathArgs {
    fn joined(&self) -> String {
        self.path.join(" ")
    }
}

#[derive(Args)]
struct ValuesArgs {
    /// Print one unquoted value per line instead of the raw output
    #[arg(long)]
    split: bool,
    #[command(flatten)]
    path: PathArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Exit 0 if the path exists in the working config
    Exists(PathArgs),
    /// Exit 0 if the path exists in the active config
    ExistsActive(PathArgs),
    /// Exit 0 if the current session has uncommitted changes
    SessionChanged,
    /// Exit 0 if the current session has unsaved changes
    SessionUnsaved,
    /// Exit 0 if running inside a configuration session
    InSession,
    /// Exit 0 if the node is a multi-value leaf
    IsMulti(PathArgs),
    /// Exit 0 if the node is a tag node
    IsTag(PathArgs),
    /// Exit 0 if the node is a leaf
    IsLeaf(PathArgs),
    /// Print the value of a single-value leaf
    ReturnValue(PathArgs),
    /// Print the active value of a single-value leaf
    ReturnActiveValue(PathArgs),
    /// Print the values of a multi-value leaf
    ReturnValues(ValuesArgs),
    /// Print the active values of a multi-value leaf
    ReturnActiveValues(ValuesArgs),
    /// Print the children of a tag node, one per line
    ListNodes(PathArgs),
    /// Print the active children of a tag node, one per line
    ListActiveNodes(PathArgs),
}

fn main() -> ExitCode {
    // RUST_LOG controls verbosity; stdout is reserved for query output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Execute one command. `Ok(false)` means a predicate answered false.
fn run(cli: Cli) -> Result<bool> {
    let mut config = match resolve_config(cli.config)? {
        Some(path) => ClientConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(executable) = cli.executable {
        config.executable = executable;
    }
    tracing::debug!(executable = %config.executable.display(), "using configuration store API");

    let client = ConfigQueryClient::new(config)?;

    let answer = match cli.command {
        Commands::Exists(p) => client.exists(&p.joined()),
        Commands::ExistsActive(p) => client.exists_active(&p.joined()),
        Commands::SessionChanged => client.session_changed(),
        Commands::SessionUnsaved => client.session_unsaved(),
        Commands::InSession => client.in_session(),
        Commands::IsMulti(p) => client.is_multi(&p.joined()),
        Commands::IsTag(p) => client.is_tag(&p.joined()),
        Commands::IsLeaf(p) => client.is_leaf(&p.joined()),
        Commands::ReturnValue(p) => {
            write_raw(&client.return_value(&p.joined())?)?;
            true
        }
        Commands::ReturnActiveValue(p) => {
            write_raw(&client.return_active_value(&p.joined())?)?;
            true
        }
        Commands::ReturnValues(v) => {
            write_values(&client.return_values(&v.path.joined())?, v.split)?;
            true
        }
        Commands::ReturnActiveValues(v) => {
            write_values(&client.return_active_values(&v.path.joined())?, v.split)?;
            true
        }
        Commands::ListNodes(p) => {
            write_lines(&client.list_nodes(&p.joined())?)?;
            true
        }
        Commands::ListActiveNodes(p) => {
            write_lines(&client.list_active_nodes(&p.joined())?)?;
            true
        }
    };

    Ok(answer)
}

fn write_raw(bytes: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes).context("Failed to write to stdout")?;
    stdout.flush().context("Failed to write to stdout")
}

fn write_values(raw: &[u8], split: bool) -> Result<()> {
    if split {
        write_lines(&split_quoted(&String::from_utf8_lossy(raw)))
    } else {
        write_raw(raw)
    }
}

fn write_lines(lines: &[String]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}").context("Failed to write to stdout")?;
    }
    Ok(())
}

/// Resolve config file path: explicit flag → ./cstore-query.toml →
/// ~/.config/cstore-query/cstore-query.toml. `None` means built-in defaults.
fn resolve_config(explicit: Option<PathBuf>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        return Ok(Some(path));
    }

    let local = Path::new(CONFIG_FILE);
    if local.exists() {
        return Ok(Some(local.to_path_buf()));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let xdg = config_dir.join("cstore-query").join(CONFIG_FILE);
        if xdg.exists() {
            return Ok(Some(xdg));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_words_are_joined() {
        let cli = Cli::try_parse_from(["cstore-query", "list-nodes", "interfaces", "ethernet"])
            .unwrap();
        match cli.command {
            Commands::ListNodes(p) => assert_eq!(p.joined(), "interfaces ethernet"),
            _ => panic!("expected list-nodes"),
        }
    }

    #[test]
    fn test_session_command_takes_no_path() {
        assert!(Cli::try_parse_from(["cstore-query", "in-session"]).is_ok());
        assert!(Cli::try_parse_from(["cstore-query", "in-session", "extra"]).is_err());
    }

    #[test]
    fn test_split_flag_before_path() {
        let cli = Cli::try_parse_from([
            "cstore-query",
            "return-values",
            "--split",
            "system",
            "ntp",
            "server",
        ])
        .unwrap();
        match cli.command {
            Commands::ReturnValues(v) => {
                assert!(v.split);
                assert_eq!(v.path.joined(), "system ntp server");
            }
            _ => panic!("expected return-values"),
        }
    }

    #[test]
    fn test_global_executable_flag() {
        let cli = Cli::try_parse_from([
            "cstore-query",
            "--executable",
            "/opt/vyatta/sbin/my_cli_shell_api",
            "exists",
            "system",
        ])
        .unwrap();
        assert_eq!(
            cli.executable,
            Some(PathBuf::from("/opt/vyatta/sbin/my_cli_shell_api"))
        );
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let result = resolve_config(Some(PathBuf::from("/nonexistent/cstore-query.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_executable_exists_is_false() {
        let cli = Cli::try_parse_from([
            "cstore-query",
            "--config",
            "/dev/null",
            "--executable",
            "/nonexistent/cli-shell-api-12345",
            "exists",
            "system",
        ])
        .unwrap();
        assert!(!run(cli).unwrap());
    }
}
