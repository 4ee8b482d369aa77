mod common;

use clap::Parser;
use sigdoc_cli::Commands;
use sigdoc_cli::SigdocCli;
use sigdoc_cli::default_output_path;
use sigdoc_core::AnyEmptyResult;
use similar_asserts::assert_eq;

#[test]
fn generate_writes_markdown_next_to_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Markdown saved to"));

	let content = std::fs::read_to_string(tmp.path().join("shapes.md"))?;
	let lines: Vec<_> = content.lines().collect();

	assert_eq!(
		lines,
		vec![
			"# Module: *shapes*",
			"## Description:",
			"Geometry helpers.",
			"## Classes:",
			"### `class Shape`",
			"#### Bases:",
			"- Bases: Base",
			"#### Decorators:",
			"#### Methods:",
			"##### `Shape.area`",
			"###### Args:",
			"- `self`: `Any` = `None`",
			"###### Returns:",
			"- `float`",
			"###### Description:",
			"No docstring provided.",
			"##### `async Shape.load`",
			"###### Args:",
			"- `self`: `Any` = `None`",
			"- `force`: `bool` = `False`",
			"###### Returns:",
			"- `None`",
			"###### Description:",
			"No docstring provided.",
			"#### Description:",
			"A closed figure.",
			"## Functions:",
			"### `perimeter`",
			"#### Args:",
			"- `shape`: `Shape` = `None`",
			"- `scale`: `Any` = `1.0`",
			"#### Returns:",
			"- `float`",
			"#### Description:",
			"Measure the outline.",
		]
	);
	assert!(content.ends_with("Measure the outline.\n"));

	Ok(())
}

#[test]
fn generate_honors_output_and_name() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;
	let output = tmp.path().join("docs.md");

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--output")
		.arg(&output)
		.arg("--name")
		.arg("geometry")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(output.display().to_string()));

	let content = std::fs::read_to_string(&output)?;
	assert!(content.starts_with("# Module: *geometry*\n"));
	assert!(!tmp.path().join("shapes.md").exists());

	Ok(())
}

#[test]
fn generate_overwrites_existing_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;
	let output = tmp.path().join("shapes.md");
	std::fs::write(&output, "old content\n".repeat(100))?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(&output)?;
	assert!(!content.contains("old content"));
	assert!(content.starts_with("# Module: *shapes*\n"));

	Ok(())
}

#[test]
fn generate_uses_discovered_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;
	std::fs::write(
		tmp.path().join("sigdoc.toml"),
		"[templates.module]\nname = \"{{ heading }} {{ name }} reference\"\n\n[templates.type]\nbase \
		 = \"- inherits `{{ base }}`\"\n",
	)?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(tmp.path().join("shapes.md"))?;
	assert!(content.starts_with("# shapes reference\n"));
	assert!(content.contains("\n- inherits `Base`\n"));
	assert!(content.contains("\n### `perimeter`\n"));

	Ok(())
}

#[test]
fn generate_uses_explicit_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;
	let config = tmp.path().join("custom.toml");
	std::fs::write(
		&config,
		"[templates.function]\nname = \"{{ heading }} {{ owner_prefix }}{{ name }}()\"\n",
	)?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--config")
		.arg(&config)
		.assert()
		.success();

	let content = std::fs::read_to_string(tmp.path().join("shapes.md"))?;
	assert!(content.contains("\n##### Shape.area()\n"));
	assert!(content.contains("\n### perimeter()\n"));

	Ok(())
}

#[test]
fn generate_fails_on_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;
	std::fs::write(
		tmp.path().join("sigdoc.toml"),
		"[templates.function]\nsignature = \"{{ name }}\"\n",
	)?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	assert!(!tmp.path().join("shapes.md").exists());

	Ok(())
}

#[test]
fn generate_fails_on_unknown_template_variable() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;
	std::fs::write(
		tmp.path().join("sigdoc.toml"),
		"[templates.function]\nname = \"{{ heading }} {{ signature }}\"\n",
	)?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("template rendering failed"));

	Ok(())
}

#[test]
fn generate_reports_syntax_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("broken.py");
	std::fs::write(&input, "def f(:\n    pass\n")?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("syntax error at 1:6"));

	assert!(!tmp.path().join("broken.md").exists());

	Ok(())
}

#[test]
fn generate_fails_on_missing_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(tmp.path().join("missing.py"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}

#[test]
fn verbose_reports_symbol_counts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.arg("--verbose")
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Documenting 1 class(es) and 1 function(s)",
		));

	Ok(())
}

#[test]
fn log_filter_is_read_from_environment() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = common::write_shapes(tmp.path())?;

	let mut cmd = common::sigdoc_cmd();
	let _ = cmd
		.env("SIGDOC_LOG", "sigdoc_core=debug")
		.arg("generate")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("extracted module"));

	Ok(())
}

#[test]
fn parses_generate_arguments() {
	let cli = SigdocCli::parse_from(["sigdoc", "generate", "src/shapes.py", "-o", "docs/shapes.md"]);
	match cli.command {
		Some(Commands::Generate {
			input,
			output,
			name,
		}) => {
			assert_eq!(input, std::path::PathBuf::from("src/shapes.py"));
			assert_eq!(output, Some(std::path::PathBuf::from("docs/shapes.md")));
			assert_eq!(name, None);
		}
		_ => panic!("expected generate command"),
	}
}

#[test]
fn default_output_replaces_extension() {
	assert_eq!(
		default_output_path(std::path::Path::new("src/shapes.py")),
		std::path::PathBuf::from("src/shapes.md")
	);
	assert_eq!(
		default_output_path(std::path::Path::new("scripts/run")),
		std::path::PathBuf::from("scripts/run.md")
	);
}
