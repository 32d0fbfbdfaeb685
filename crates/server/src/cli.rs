use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "droidview")]
#[command(about = "Browser-based Android device mirroring and control")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v debug, -vv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Path to the adb executable (skips the automatic search)
	#[arg(long, global = true, value_name = "PATH")]
	pub adb: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the device bridge server
	Serve {
		/// Host to bind
		#[arg(long, default_value = "0.0.0.0")]
		host: String,
		/// Port to bind
		#[arg(long, default_value_t = 5679)]
		port: u16,
		/// Milliseconds between screen captures on a mirroring session
		#[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..=10_000))]
		frame_interval_ms: u64,
	},

	/// List attached devices
	Devices,
}
