/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::config::config_file::Settings;
use crate::parsing::filesystem::Filesystem;
use crate::reports::ledger_reporter::LedgerReporter;
use crate::reports::pipeline::{Pipeline, Report};
use crate::util::clock::SystemClock;
use anyhow::Error;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

mod config;
mod gl;
mod parsing;
mod reports;
mod util;

#[derive(Parser)]
#[command(
	name = "cropsheet",
	version = "0.1.0",
	about = "Season income and expense reports for a farm plot"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	// -----------
	// -- FLAGS --
	// -----------
	/// Specifies the report request (JSON)
	#[arg(short)]
	file: String,

	/// Custom config file location (default: ~/.config/cropsheet/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Directory documents are written to
	#[arg(short, long)]
	output_dir: Option<String>,

	/// Image shown in the document header
	#[arg(long)]
	logo: Option<String>,

	/// Log debug detail to stderr
	#[arg(short, long)]
	verbose: bool,
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Pdf,     // write the document
	Summary, // print totals and tables
	Check,   // list rows left out of the totals
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	util::logging::init_tracing(args.verbose);

	let fs = Filesystem::new();
	let request = fs.read_request(&args.file)?;
	let clock = SystemClock;

	match args.command {
		Directive::Pdf => {
			// Only document generation reads config, so console reports work
			// without one
			let settings = settings(&fs, &args)?;
			let pipeline = Pipeline::new(&settings, &clock)?;
			let artifact = pipeline.run(&request)?;
			println!("{}", artifact.path.display());
		},
		Directive::Summary => {
			LedgerReporter::new(Report::build(&request, &clock)?).summary()
		},
		Directive::Check => {
			LedgerReporter::new(Report::build(&request, &clock)?).check()
		},
	}

	Ok(())
}

/// Config file values, overridden by command line flags.
fn settings(fs: &Filesystem, args: &Cli) -> Result<Settings, Error> {
	let config = fs.get_config(args.config.as_ref())?;
	let mut settings = Settings::from_config(config);

	if let Some(dir) = &args.output_dir {
		settings.output_dir = PathBuf::from(dir);
	}
	if let Some(logo) = &args.logo {
		settings.logo_path = PathBuf::from(logo);
	}

	debug!(?settings, "resolved settings");
	Ok(settings)
}
