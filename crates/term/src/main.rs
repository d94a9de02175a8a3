//! kiln: inspect, edit and filter files through kiln buffers.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use kiln_editor_core::Options;
use tracing::debug;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let options = match &cli.config {
		Some(path) => Options::load(path)?,
		None => Options::default(),
	};
	debug!(?options, "buffer options");

	commands::run(cli.command, options, &mut std::io::stdout().lock())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("KILN_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("kiln=debug,kiln_editor_core=debug,kiln_gap=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
