use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use sigdoc_cli::Commands;
use sigdoc_cli::OutputFormat;
use sigdoc_cli::SigdocCli;
use sigdoc_cli::default_output_path;
use sigdoc_core::Callable;
use sigdoc_core::Generator;
use sigdoc_core::Module;
use sigdoc_core::Parameter;
use sigdoc_core::ParameterKind;
use sigdoc_core::SigdocConfig;
use sigdoc_core::SigdocResult;
use sigdoc_core::Symbol;
use sigdoc_core::Templates;
use sigdoc_core::extract_file;
use sigdoc_core::extract_source;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "SIGDOC_LOG";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SigdocCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Generate {
			input,
			output,
			name,
		}) => run_generate(&args, input, output.as_deref(), name.as_deref()),
		Some(Commands::Extract { input, format }) => run_extract(input, *format),
		Some(Commands::Check {
			input,
			output,
			name,
			diff,
		}) => run_check(&args, input, output.as_deref(), name.as_deref(), *diff),
		None => {
			eprintln!("No subcommand specified. Run `sigdoc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<sigdoc_core::SigdocError>() {
			Ok(sigdoc_err) => {
				let report: miette::Report = (*sigdoc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr, filtered by `SIGDOC_LOG` when set.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(true)
		.init();
}

fn resolve_root(args: &SigdocCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Templates from `--config`, else from the discovered config file, else
/// the defaults.
fn load_templates(args: &SigdocCli) -> SigdocResult<Templates> {
	if let Some(config_path) = &args.config {
		return SigdocConfig::load_file(config_path).map(|config| config.templates);
	}

	let root = resolve_root(args);
	let config = SigdocConfig::load(&root)?;
	if config.is_none() {
		tracing::debug!(root = %root.display(), "no config file found, using default templates");
	}

	Ok(config.map(|config| config.templates).unwrap_or_default())
}

fn load_module(input: &Path, name: Option<&str>) -> SigdocResult<Module> {
	match name {
		Some(name) => {
			let source = std::fs::read_to_string(input)?;
			extract_source(name, &source)
		}
		None => extract_file(input),
	}
}

fn render(args: &SigdocCli, input: &Path, name: Option<&str>) -> SigdocResult<Generator> {
	let module = load_module(input, name)?;
	let templates = load_templates(args)?;

	if args.verbose {
		println!(
			"Documenting {} class(es) and {} function(s) from {}",
			module.types.len(),
			module.functions.len(),
			input.display()
		);
	}

	Ok(Generator::new(templates).with_module(module))
}

fn run_generate(
	args: &SigdocCli,
	input: &Path,
	output: Option<&Path>,
	name: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
	let generator = render(args, input, name)?;
	let lines = generator.generate_to(&output)?;

	tracing::debug!(output = %output.display(), lines = lines.len(), "generated markdown");
	println!("Markdown saved to {}", output.display());

	Ok(())
}

fn run_extract(input: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let module = extract_file(input)?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&Symbol::Module(module))?);
		}
		OutputFormat::Text => print_outline(&module),
	}

	Ok(())
}

fn run_check(
	args: &SigdocCli,
	input: &Path,
	output: Option<&Path>,
	name: Option<&str>,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
	let expected = render(args, input, name)?.generate()?.to_text();

	let current = match std::fs::read_to_string(&output) {
		Ok(current) => current,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
			eprintln!(
				"{} {} does not exist.",
				colored!("Missing:", red),
				output.display()
			);
			eprintln!("\nRun `sigdoc generate {}` to create it.", input.display());
			process::exit(1);
		}
		Err(e) => return Err(e.into()),
	};

	if current == expected {
		println!("Check passed: {} is up to date.", output.display());
		return Ok(());
	}

	eprintln!(
		"{} {} is out of date.",
		colored!("Stale:", yellow),
		output.display()
	);

	if show_diff {
		eprintln!();
		print_diff(&current, &expected);
	}

	eprintln!("\nRun `sigdoc generate {}` to update it.", input.display());
	process::exit(1);
}

/// Print the module as an indented outline of declarations.
fn print_outline(module: &Module) {
	println!("{} {}", colored!("module", bold), module.name);

	for ty in &module.types {
		if ty.base_expressions.is_empty() {
			println!("  {} {}", colored!("class", bold), ty.name);
		} else {
			println!(
				"  {} {}({})",
				colored!("class", bold),
				ty.name,
				ty.base_expressions.join(", ")
			);
		}

		for method in &ty.methods {
			println!("    {}", signature(method));
		}
	}

	for function in &module.functions {
		println!("  {}", signature(function));
	}
}

/// A one-line signature such as `async def load(self, *, force: bool = False)`.
fn signature(callable: &Callable) -> String {
	let keyword = if callable.is_async { "async def" } else { "def" };
	let parameters = signature_parameters(&callable.parameters).join(", ");
	let returns = callable
		.return_type
		.as_deref()
		.map(|return_type| format!(" -> {return_type}"))
		.unwrap_or_default();

	format!(
		"{} {}({parameters}){returns}",
		colored!(keyword, bold),
		callable.name
	)
}

/// Parameter entries with the `/` and bare `*` separators restored.
fn signature_parameters(parameters: &[Parameter]) -> Vec<String> {
	let mut entries = vec![];
	let mut previous: Option<ParameterKind> = None;

	for parameter in parameters {
		if previous == Some(ParameterKind::PositionalOnly)
			&& parameter.kind != ParameterKind::PositionalOnly
		{
			entries.push("/".to_string());
		}

		if parameter.kind == ParameterKind::KeywordOnly
			&& !matches!(
				previous,
				Some(ParameterKind::KeywordOnly | ParameterKind::VariadicPositional)
			) {
			entries.push("*".to_string());
		}

		let mut entry = format!("{}: {}", parameter.name, parameter.type_hint);
		if let Some(default) = &parameter.default_value {
			entry.push_str(" = ");
			entry.push_str(default);
		}
		entries.push(entry);
		previous = Some(parameter.kind);
	}

	if previous == Some(ParameterKind::PositionalOnly) {
		entries.push("/".to_string());
	}

	entries
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
