//! `lca init` command - Write a sample project

use console::style;
use miette::{IntoDiagnostic, Result};
use rust_embed::Embed;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;

#[derive(Embed)]
#[folder = "samples/"]
struct Samples;

/// Files written by `lca init`, in display order
const SAMPLE_FILES: &[(&str, &str)] = &[
    ("product.yaml", "product description"),
    ("reference.csv", "reference emission factors"),
    ("lca.yaml", "project configuration"),
];

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = args.path;

    // Create directory if it doesn't exist
    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let mut skipped = 0;
    for (name, description) in SAMPLE_FILES {
        let target = path.join(name);
        if target.exists() && !args.force {
            skipped += 1;
            if !global.quiet {
                println!(
                    "{} {} already exists, kept",
                    style("!").yellow(),
                    style(target.display()).cyan()
                );
            }
            continue;
        }
        write_sample(name, &target)?;
        if !global.quiet {
            println!(
                "{} Wrote {} ({})",
                style("✓").green(),
                style(target.display()).cyan(),
                description
            );
        }
    }

    if global.quiet {
        return Ok(());
    }
    println!();
    if skipped > 0 {
        println!("Use {} to overwrite", style("lca init --force").yellow());
        println!();
    }
    println!("Next steps:");
    println!(
        "  {} Check the inputs",
        style("lca check").yellow()
    );
    println!(
        "  {} Compute the impact matrix",
        style("lca report").yellow()
    );
    println!(
        "  {} Try a scenario",
        style("lca report --use-country China --lifetime 5").yellow()
    );
    Ok(())
}

fn write_sample(name: &str, target: &Path) -> Result<()> {
    let file = Samples::get(name)
        .ok_or_else(|| miette::miette!("Sample '{}' is missing from the binary", name))?;
    std::fs::write(target, file.data.as_ref()).into_diagnostic()
}
