use std::path::PathBuf;

use clap::{Parser, Subcommand};
use horizon_primitives::{HighlightStyle, Theme};

#[derive(Parser, Debug)]
#[command(name = "horizon")]
#[command(about = "Inspect and maintain stored highlights")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (defaults to the user config directory)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Storage file, overriding `[store] path`
	#[arg(long, short = 's', value_name = "PATH")]
	pub storage: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List highlights, newest first
	List {
		/// Only highlights of this exact URL
		#[arg(long)]
		url: Option<String>,
	},
	/// Print one highlight as JSON
	Show { id: String },
	/// Delete a highlight
	Delete { id: String },
	/// Manage the notes of a highlight
	Note {
		#[command(subcommand)]
		action: NoteAction,
	},
	/// Remove stale pending scroll intents
	Cleanup,
	/// Show or change the appearance of new highlights
	Defaults {
		#[arg(long, value_parser = parse_theme)]
		theme: Option<Theme>,
		#[arg(long, value_parser = parse_style)]
		style: Option<HighlightStyle>,
	},
}

/// Note subcommands. Notes are addressed by position, starting at 0.
#[derive(Subcommand, Debug)]
pub enum NoteAction {
	/// Attach a note
	Add { id: String, text: String },
	/// Replace the text of a note
	Edit { id: String, index: usize, text: String },
	/// Remove a note
	Rm { id: String, index: usize },
}

fn parse_theme(s: &str) -> Result<Theme, String> {
	s.parse().map_err(|err| format!("{err} (expected light or dark)"))
}

fn parse_style(s: &str) -> Result<HighlightStyle, String> {
	s.parse().map_err(|err| format!("{err} (expected underline or background)"))
}
