//! mutasi: convert BCA e-statement text into CSV/JSON.
//!
//! Usage:
//!   mutasi convert <PATHS>...   Parse statements (files or folders) and export
//!   mutasi show <FILE>          Print account info, totals and reconciliation
//!   mutasi config init|show     Manage ~/.mutasi/config.toml

use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use mutasi_ingest::ParseOptions;
use mutasi_report::{ExportFormat, reconcile, render_summary};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod convert;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("MUTASI_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "mutasi", version = VERSION, about = "BCA e-statement to CSV/JSON converter")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse statement files or folders and write exports
    Convert {
        /// Statement files (.txt) or folders to search recursively
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Export format: csv or json (default from config)
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Output folder (default: next to each input)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Year for statements whose period has none
        #[arg(long)]
        year: Option<i32>,
    },

    /// Print the account summary and footer reconciliation for one statement
    Show {
        file: PathBuf,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Manage ~/.mutasi/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();
}

fn parse_options(cfg: &config::Config, year: Option<i32>) -> Result<ParseOptions> {
    let fallback_year = match year {
        Some(y) => y,
        None => cfg.fallback_year(Utc::now())?,
    };
    Ok(ParseOptions::new(fallback_year))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Convert {
            paths,
            format,
            out_dir,
            year,
        } => {
            let cfg = config::load_config()?;
            let opts = parse_options(&cfg, year)?;
            let format = format.unwrap_or(cfg.export.format);
            let out_dir = out_dir.or(cfg.export.out_dir);

            let inputs = convert::collect_inputs(&paths)?;
            if inputs.is_empty() {
                bail!("no .txt or .pdf files found");
            }

            let failed = convert::run_convert(&inputs, format, out_dir.as_deref(), &opts).await;
            if failed > 0 {
                std::process::exit(1);
            }
        }

        Command::Show { file, year } => {
            let cfg = config::load_config()?;
            let opts = parse_options(&cfg, year)?;
            let st = convert::load_statement(&file, &opts).await?;
            let recon = reconcile(&st);
            print!("{}", render_summary(&st, Some(&recon)));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "mutasi", "convert", "a.txt", "stmts", "--format", "json", "--year", "2023", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Convert { paths, format, out_dir, year } => {
                assert_eq!(paths, vec![PathBuf::from("a.txt"), PathBuf::from("stmts")]);
                assert_eq!(format, Some(ExportFormat::Json));
                assert_eq!(out_dir, None);
                assert_eq!(year, Some(2023));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["mutasi", "convert", "a.txt", "--format", "xlsx"]).is_err());
        assert!(Cli::try_parse_from(["mutasi", "convert"]).is_err());
    }

    #[test]
    fn test_year_flag_overrides_config() {
        let mut cfg = config::Config::default();
        cfg.parse.fallback_year = Some(2019);
        assert_eq!(parse_options(&cfg, Some(2022)).unwrap().fallback_year, 2022);
        assert_eq!(parse_options(&cfg, None).unwrap().fallback_year, 2019);
    }
}
