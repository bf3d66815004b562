//! `lca check` command - Validate inputs before running an assessment

use console::style;
use miette::Result;
use tracing::subscriber::NoSubscriber;

use crate::cli::args::InputArgs;
use crate::cli::helpers::Session;
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Strict mode - missing reference factors become errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    // Loading validates the config, the product description and the table
    let session = Session::load(&args.input)?;
    if !global.quiet {
        println!(
            "{} Product {} ({} material(s))",
            style("✓").green(),
            style(session.product_path.display()).cyan(),
            session.product.materials.len()
        );
        println!(
            "{} Reference table: {} entities, {} indicator(s)",
            style("✓").green(),
            session.assessment.reference.entities().count(),
            session.assessment.reference.indicators().len()
        );
    }

    // Distances, grid mixes and normalization factors are fatal when missing.
    // Missing reference factors are listed below, so the run stays silent.
    let missing = session.assessment.missing_entities(&session.product);
    tracing::subscriber::with_default(NoSubscriber::default(), || {
        session.assessment.run(&session.product)
    })?;
    if !global.quiet {
        println!(
            "{} Distances, electricity mixes and normalization factors resolved",
            style("✓").green()
        );
    }

    if missing.is_empty() {
        if !global.quiet {
            println!("{} Every reference factor is present", style("✓").green());
        }
        return Ok(());
    }

    let marker = if args.strict {
        style("✗").red()
    } else {
        style("!").yellow()
    };
    for warning in &missing {
        eprintln!("{} {}", marker, warning);
    }

    if args.strict {
        Err(miette::miette!(
            "{} reference factor(s) missing (strict mode)",
            missing.len()
        ))
    } else {
        if !global.quiet {
            println!(
                "{} {} factor(s) will count as 0; use {} to fail instead",
                style("!").yellow(),
                missing.len(),
                style("--strict").yellow()
            );
        }
        Ok(())
    }
}
