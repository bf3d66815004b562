//! `lca config` command - Inspect the layered configuration

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::{Path, PathBuf};

use crate::cli::helpers::write_output;
use crate::cli::output::serialize;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{Config, CONFIG_KEYS, ENV_VARS, PROJECT_CONFIG_FILE};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path(PathArgs),

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Configuration file to layer instead of ./lca.yaml
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Configuration file to report instead of ./lca.yaml
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path(args) => run_path(args),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    // If a specific key is requested, show just that value
    if let Some(key) = &args.key {
        if !CONFIG_KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                help = "Run `lca config keys` to list the valid keys",
                "Unknown configuration key '{}'",
                key
            ));
        }
        let value = config
            .value_of(key)
            .ok_or_else(|| miette::miette!("Key '{}' is not set", key))?;
        println!("{}", value.trim_end());
        return Ok(());
    }

    match global.format.resolve(config.default_format.as_deref()) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            write_output(&serialize(&config, format)?, global.output.as_deref(), global.quiet)
        }
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, _) in CONFIG_KEYS {
                print_config_value(key, config.value_of(key).as_deref());
            }

            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables ({})", ENV_VARS.join(", "));
            println!("  2. Project config ({} or --config)", PROJECT_CONFIG_FILE);
            println!("  3. Global config (~/.config/lca/config.yaml)");
            println!("  4. Built-in defaults");
            Ok(())
        }
    }
}

fn run_path(args: PathArgs) -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!(
            "  {} {}",
            style("Global:").cyan(),
            style("(no home directory)").dim()
        ),
    }

    let project = args
        .config
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    println!();
    print_path("Project:", &project);
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in CONFIG_KEYS {
        println!("  {:<28} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style(format!("Set them in {} or the global config file.", PROJECT_CONFIG_FILE)).dim()
    );

    Ok(())
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("          {}", style("(exists)").green());
    } else {
        println!("          {}", style("(not created)").dim());
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    match value {
        Some(v) if v.contains('\n') => {
            println!("  {}:", style(key).cyan());
            for line in v.lines() {
                println!("    {}", style(line).yellow());
            }
        }
        Some(v) => println!("  {}: {}", style(key).cyan(), style(v).yellow()),
        None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
    }
}
