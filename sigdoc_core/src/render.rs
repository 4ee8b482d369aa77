use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use derive_more::Deref;
use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::UndefinedBehavior;
use minijinja::Value;
use minijinja::context;

use crate::Callable;
use crate::Module;
use crate::SigdocError;
use crate::SigdocResult;
use crate::SymbolRef;
use crate::Templates;
use crate::Type;
use crate::template::slot;

/// Description rendered for symbols without a docstring.
pub const MISSING_DOCSTRING: &str = "No docstring provided.";

/// Heading level of the outermost rendered symbol.
pub const ROOT_HEADING_LEVEL: usize = 1;

/// Rendered documentation. Every element is exactly one line without its
/// terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct RenderedLines(#[deref] Vec<String>);

impl RenderedLines {
	pub fn into_inner(self) -> Vec<String> {
		self.0
	}

	/// The text written to disk: each line followed by `\n`.
	pub fn to_text(&self) -> String {
		let mut text = String::with_capacity(self.0.iter().map(|line| line.len() + 1).sum());
		for line in &self.0 {
			text.push_str(line);
			text.push('\n');
		}
		text
	}
}

impl From<Vec<String>> for RenderedLines {
	fn from(lines: Vec<String>) -> Self {
		Self(lines)
	}
}

impl IntoIterator for RenderedLines {
	type IntoIter = std::vec::IntoIter<String>;
	type Item = String;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

/// The docstring to render: the symbol's own, or [`MISSING_DOCSTRING`].
pub fn describe(docstring: Option<&str>) -> &str {
	match docstring {
		Some(docstring) if !docstring.is_empty() => docstring,
		_ => MISSING_DOCSTRING,
	}
}

/// Renders symbols into lines with a fixed set of templates.
///
/// All templates are compiled up front, so a syntax error in any slot is
/// reported by [`Renderer::new`] even if that slot is never used.
pub struct Renderer<'t> {
	env: Environment<'t>,
}

impl<'t> Renderer<'t> {
	pub fn new(templates: &'t Templates) -> SigdocResult<Self> {
		let mut env = Environment::new();
		env.set_undefined_behavior(UndefinedBehavior::Strict);
		env.set_auto_escape_callback(|_| AutoEscape::None);

		for (name, source) in templates.slots() {
			env.add_template(name, source)?;
		}

		Ok(Self { env })
	}

	/// Render any symbol at the given heading level.
	pub fn render<'a>(
		&self,
		symbol: impl Into<SymbolRef<'a>>,
		heading_level: usize,
	) -> SigdocResult<RenderedLines> {
		let mut lines = vec![];
		self.render_symbol(symbol.into(), heading_level, &mut lines)?;
		Ok(RenderedLines(lines))
	}

	fn render_symbol(
		&self,
		symbol: SymbolRef<'_>,
		heading_level: usize,
		lines: &mut Vec<String>,
	) -> SigdocResult<()> {
		match symbol {
			SymbolRef::Module(module) => self.render_module(module, heading_level, lines),
			SymbolRef::Type(ty) => self.render_type(ty, heading_level, lines),
			SymbolRef::Callable(callable) => self.render_callable(callable, heading_level, lines),
		}
	}

	fn render_callable(
		&self,
		callable: &Callable,
		heading_level: usize,
		lines: &mut Vec<String>,
	) -> SigdocResult<()> {
		let sub_heading = heading(heading_level + 1);
		let owner_prefix = callable
			.owner_type_name
			.as_deref()
			.map(|owner| format!("{owner}."))
			.unwrap_or_default();

		self.emit(
			slot::FUNCTION_NAME,
			context! {
				heading => heading(heading_level),
				async_marker => if callable.is_async { "async " } else { "" },
				owner_prefix,
				name => callable.name,
			},
			lines,
		)?;

		self.emit(
			slot::FUNCTION_ARGS_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		for parameter in &callable.parameters {
			if parameter.is_variadic() {
				self.emit(
					slot::FUNCTION_VARIADIC_PARAMETER,
					context! { name => parameter.name },
					lines,
				)?;
			} else {
				self.emit(
					slot::FUNCTION_PARAMETER,
					context! {
						name => parameter.name,
						type_hint => parameter.type_hint,
						default => parameter.default_value.as_deref().unwrap_or("None"),
					},
					lines,
				)?;
			}
		}

		self.emit(
			slot::FUNCTION_RETURNS_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		self.emit(
			slot::FUNCTION_RETURN_TYPE,
			context! { return_type => callable.return_type.as_deref().unwrap_or("None") },
			lines,
		)?;

		self.emit(
			slot::FUNCTION_DESCRIPTION_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		self.emit(
			slot::FUNCTION_DESCRIPTION,
			context! { docstring => describe(callable.docstring.as_deref()) },
			lines,
		)
	}

	fn render_type(
		&self,
		ty: &Type,
		heading_level: usize,
		lines: &mut Vec<String>,
	) -> SigdocResult<()> {
		let sub_heading = heading(heading_level + 1);

		self.emit(
			slot::TYPE_NAME,
			context! { heading => heading(heading_level), name => ty.name },
			lines,
		)?;

		self.emit(
			slot::TYPE_BASES_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		for base in &ty.base_expressions {
			self.emit(slot::TYPE_BASE, context! { base }, lines)?;
		}

		self.emit(
			slot::TYPE_DECORATORS_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		for decorator in &ty.decorators {
			self.emit(slot::TYPE_DECORATOR, context! { decorator }, lines)?;
		}

		self.emit(
			slot::TYPE_METHODS_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		for method in &ty.methods {
			self.render_callable(method, heading_level + 2, lines)?;
		}

		self.emit(
			slot::TYPE_DESCRIPTION_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		self.emit(
			slot::TYPE_DESCRIPTION,
			context! { docstring => describe(ty.docstring.as_deref()) },
			lines,
		)
	}

	fn render_module(
		&self,
		module: &Module,
		heading_level: usize,
		lines: &mut Vec<String>,
	) -> SigdocResult<()> {
		let sub_heading = heading(heading_level + 1);

		self.emit(
			slot::MODULE_NAME,
			context! { heading => heading(heading_level), name => module.name },
			lines,
		)?;

		self.emit(
			slot::MODULE_DESCRIPTION_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		self.emit(
			slot::MODULE_DESCRIPTION,
			context! { docstring => describe(module.docstring.as_deref()) },
			lines,
		)?;

		self.emit(
			slot::MODULE_CLASSES_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		for ty in &module.types {
			self.render_type(ty, heading_level + 2, lines)?;
		}

		self.emit(
			slot::MODULE_FUNCTIONS_TITLE,
			context! { heading => sub_heading },
			lines,
		)?;
		for function in &module.functions {
			self.render_callable(function, heading_level + 2, lines)?;
		}

		Ok(())
	}

	/// Render one slot and append its output, one element per line.
	fn emit(&self, name: &str, ctx: Value, lines: &mut Vec<String>) -> SigdocResult<()> {
		let rendered = self.env.get_template(name)?.render(ctx)?;
		lines.extend(rendered.split('\n').map(str::to_string));
		Ok(())
	}
}

/// The heading marker for a level: `#` repeated `level` times.
fn heading(level: usize) -> String {
	"#".repeat(level)
}

/// Binds at most one symbol and renders it as a standalone document.
///
/// When more than one symbol is bound the module wins, then the type, then
/// the callable.
#[derive(Debug, Clone, Default)]
pub struct Generator {
	module: Option<Module>,
	ty: Option<Type>,
	callable: Option<Callable>,
	templates: Templates,
}

impl Generator {
	pub fn new(templates: Templates) -> Self {
		Self {
			templates,
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_module(mut self, module: Module) -> Self {
		self.module = Some(module);
		self
	}

	#[must_use]
	pub fn with_type(mut self, ty: Type) -> Self {
		self.ty = Some(ty);
		self
	}

	#[must_use]
	pub fn with_callable(mut self, callable: Callable) -> Self {
		self.callable = Some(callable);
		self
	}

	/// The symbol that [`generate`](Self::generate) will render.
	pub fn bound(&self) -> Option<SymbolRef<'_>> {
		self.module
			.as_ref()
			.map(SymbolRef::from)
			.or_else(|| self.ty.as_ref().map(SymbolRef::from))
			.or_else(|| self.callable.as_ref().map(SymbolRef::from))
	}

	/// Render the bound symbol.
	pub fn generate(&self) -> SigdocResult<RenderedLines> {
		let symbol = self.bound().ok_or(SigdocError::NoSymbol)?;
		Renderer::new(&self.templates)?.render(symbol, ROOT_HEADING_LEVEL)
	}

	/// Render the bound symbol and overwrite `path` with the result.
	pub fn generate_to(&self, path: impl AsRef<Path>) -> SigdocResult<RenderedLines> {
		let lines = self.generate()?;
		write_lines(path, &lines)?;
		Ok(lines)
	}
}

/// Write every line followed by `\n`, replacing any existing content.
pub fn write_lines(path: impl AsRef<Path>, lines: &[String]) -> SigdocResult<()> {
	let path = path.as_ref();
	let mut writer = BufWriter::new(File::create(path)?);

	for line in lines {
		writeln!(writer, "{line}")?;
	}

	writer.flush()?;
	tracing::debug!(path = %path.display(), lines = lines.len(), "wrote rendered lines");

	Ok(())
}
