use clap::Parser;
use lca::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(&global);

    match cli.command {
        Commands::Init(args) => lca::cli::commands::init::run(args, &global),
        Commands::Report(args) => lca::cli::commands::report::run(args, &global),
        Commands::Materials(args) => lca::cli::commands::materials::run(args, &global),
        Commands::Transport(args) => lca::cli::commands::transport::run(args, &global),
        Commands::Check(args) => lca::cli::commands::check::run(args, &global),
        Commands::Config(cmd) => lca::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => lca::cli::commands::completions::run(args),
    }
}

/// Log to stderr; RUST_LOG wins over --verbose/--quiet
fn init_logging(global: &GlobalOpts) {
    let default_level = if global.verbose {
        "lca=debug,warn"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}
