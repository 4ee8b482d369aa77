use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate Markdown reference docs from Python declarations.",
	long_about = "sigdoc reads a Python source file, extracts its modules, classes, functions and \
	              parameters, and renders them as Markdown reference documentation.\n\nQuick \
	              start:\n  sigdoc generate src/shapes.py   Write src/shapes.md\n  sigdoc extract \
	              src/shapes.py    Print the extracted symbols\n  sigdoc check src/shapes.py      \
	              Verify the Markdown is up to date"
)]
pub struct SigdocCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, used to discover `sigdoc.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Load templates from this config file instead of discovering one.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a Python source file to Markdown.
	///
	/// Extracts the module, its top-level classes and functions, and writes
	/// the rendered documentation to the output file. An existing output file
	/// is overwritten.
	Generate {
		/// The Python source file to document.
		input: PathBuf,

		/// Where to write the Markdown. Defaults to the input path with an
		/// `.md` extension.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Module name used in the heading. Defaults to the input file stem.
		#[arg(long, short)]
		name: Option<String>,
	},
	/// Print the symbols extracted from a Python source file.
	Extract {
		/// The Python source file to inspect.
		input: PathBuf,

		/// Output format. Use `text` for an indented outline or `json` for
		/// the full symbol model.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that the generated Markdown is up to date.
	///
	/// Renders the input in memory and compares it with the existing output
	/// file. Exits with a non-zero status code when the output is missing or
	/// stale, which makes it suitable for CI pipelines.
	Check {
		/// The Python source file to document.
		input: PathBuf,

		/// The Markdown file to compare against. Defaults to the input path
		/// with an `.md` extension.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Module name used in the heading. Must match the name given to
		/// `generate`. Defaults to the input file stem.
		#[arg(long, short)]
		name: Option<String>,

		/// Show a unified diff between the current and expected content.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable outline.
	Text,
	/// Pretty-printed JSON of the symbol model.
	Json,
}

/// The default Markdown path for a source file: the same path with an `.md`
/// extension.
pub fn default_output_path(input: &Path) -> PathBuf {
	input.with_extension("md")
}
