use anyhow::Result;
use clap::{ColorChoice, Parser};
use folio::{
    cli::{self, Cli, Commands},
    config::{SiteConfig, init_config},
    logger,
};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    folio::core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    let config = init_config(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Init { .. } => cli::init::new_site(&config),
        Commands::Build { .. } => cli::build::build_site(&config, false).map(|_| ()),
        Commands::Serve { .. } => cli::serve::serve_site(),
        Commands::Query { args } => cli::query::run_query(args, &config),
    }
}
