use std::path::Path;

use crate::Callable;
use crate::Module;
use crate::Parameter;
use crate::ParameterKind;
use crate::SigdocError;
use crate::SigdocResult;
use crate::Symbol;
use crate::Type;
use crate::parser::parse;
use crate::syntax::Arguments;
use crate::syntax::ClassDef;
use crate::syntax::Declaration;
use crate::syntax::Expr;
use crate::syntax::FunctionDef;
use crate::syntax::FunctionKind;
use crate::syntax::ModuleRoot;
use crate::syntax::Stmt;

/// Module name used when a path has no usable file stem.
pub const FALLBACK_MODULE_NAME: &str = "module";

/// Extract the symbol a declaration introduces. `module_name` is only used
/// when the declaration is a module root. Function-like declarations
/// extracted here have no owner.
pub fn extract(declaration: Declaration<'_>, module_name: &str) -> SigdocResult<Symbol> {
	match declaration {
		Declaration::ModuleRoot(root) => extract_module(module_name, root).map(Symbol::Module),
		Declaration::ClassLike(def) => extract_type(def).map(Symbol::Type),
		Declaration::FunctionLike(def) | Declaration::AsyncFunctionLike(def) => {
			extract_callable(def, None).map(Symbol::Callable)
		}
	}
}

/// Read, parse and extract one source file. The module is named after the
/// file stem.
pub fn extract_file(path: impl AsRef<Path>) -> SigdocResult<Module> {
	let path = path.as_ref();
	let source = std::fs::read_to_string(path)?;
	let name = path
		.file_stem()
		.map_or_else(|| FALLBACK_MODULE_NAME.to_string(), |stem| stem.to_string_lossy().into_owned());

	tracing::debug!(path = %path.display(), module = %name, "extracting file");

	extract_source(&name, &source)
}

/// Parse and extract one in-memory source unit.
pub fn extract_source(name: &str, source: &str) -> SigdocResult<Module> {
	let root = parse(source)?;
	extract_module(name, &root)
}

/// Build a [`Module`] from the direct top-level statements of `root`.
pub fn extract_module(name: &str, root: &ModuleRoot) -> SigdocResult<Module> {
	let mut types = vec![];
	let mut functions = vec![];

	for stmt in &root.body {
		match stmt.declaration() {
			Some(Declaration::ClassLike(def)) => types.push(extract_type(def)?),
			Some(Declaration::FunctionLike(def) | Declaration::AsyncFunctionLike(def)) => {
				functions.push(extract_callable(def, None)?);
			}
			Some(Declaration::ModuleRoot(_)) | None => {}
		}
	}

	tracing::debug!(
		module = name,
		types = types.len(),
		functions = functions.len(),
		"extracted module"
	);

	Ok(Module {
		name: name.to_string(),
		types,
		functions,
		docstring: docstring(&root.body),
	})
}

/// Build a [`Type`] from a class declaration. Only function-like statements
/// directly in the class body become methods.
pub fn extract_type(def: &ClassDef) -> SigdocResult<Type> {
	let mut methods = vec![];

	for stmt in &def.body {
		if let Some(Declaration::FunctionLike(method) | Declaration::AsyncFunctionLike(method)) =
			stmt.declaration()
		{
			methods.push(extract_callable(method, Some(&def.name))?);
		}
	}

	tracing::debug!(name = %def.name, methods = methods.len(), "extracted type");

	Ok(Type {
		name: def.name.clone(),
		base_expressions: def.bases.iter().map(ToString::to_string).collect(),
		methods,
		docstring: docstring(&def.body),
		decorators: decorators(&def.decorator_list),
	})
}

/// Build a [`Callable`] from a function-like declaration.
pub fn extract_callable(def: &FunctionDef, owner: Option<&str>) -> SigdocResult<Callable> {
	let parameters = extract_parameters(&def.args, &def.name)?;

	tracing::debug!(name = %def.name, owner, parameters = parameters.len(), "extracted callable");

	Ok(Callable {
		name: def.name.clone(),
		parameters,
		return_type: def.returns.as_ref().map(ToString::to_string),
		docstring: docstring(&def.body),
		decorators: decorators(&def.decorator_list),
		is_async: def.kind == FunctionKind::Async,
		owner_type_name: owner.map(str::to_string),
	})
}

/// Build the ordered parameter sequence of a declaration.
///
/// Positional defaults bind to the trailing run of the position-eligible
/// parameters. Keyword-only defaults pair index-for-index with the
/// keyword-only parameters, so any slot may be required. More defaults than
/// position-eligible parameters, or a keyword-only default list of a
/// different length, is rejected rather than truncated.
pub fn extract_parameters(args: &Arguments, function: &str) -> SigdocResult<Vec<Parameter>> {
	let position_eligible: Vec<_> = args
		.posonlyargs
		.iter()
		.map(|arg| (arg, ParameterKind::PositionalOnly))
		.chain(args.args.iter().map(|arg| (arg, ParameterKind::Positional)))
		.collect();

	if args.defaults.len() > position_eligible.len() {
		return Err(SigdocError::MalformedParameters {
			function: function.to_string(),
			reason: format!(
				"{} default value(s) for {} positional parameter(s)",
				args.defaults.len(),
				position_eligible.len()
			),
		});
	}

	if args.kw_defaults.len() != args.kwonlyargs.len() {
		return Err(SigdocError::MalformedParameters {
			function: function.to_string(),
			reason: format!(
				"{} keyword-only default slot(s) for {} keyword-only parameter(s)",
				args.kw_defaults.len(),
				args.kwonlyargs.len()
			),
		});
	}

	let offset = position_eligible.len() - args.defaults.len();
	let mut parameters = Vec::with_capacity(
		position_eligible.len()
			+ args.kwonlyargs.len()
			+ usize::from(args.vararg.is_some())
			+ usize::from(args.kwarg.is_some()),
	);

	for (index, (arg, kind)) in position_eligible.into_iter().enumerate() {
		let default = index
			.checked_sub(offset)
			.and_then(|slot| args.defaults.get(slot))
			.map(Expr::as_str);
		parameters.push(
			Parameter::new(&arg.name, annotation(arg.annotation.as_ref()), kind)
				.with_default(default),
		);
	}

	if let Some(arg) = &args.vararg {
		parameters.push(Parameter::new(
			&arg.name,
			annotation(arg.annotation.as_ref()),
			ParameterKind::VariadicPositional,
		));
	}

	for (arg, default) in args.kwonlyargs.iter().zip(&args.kw_defaults) {
		parameters.push(
			Parameter::new(
				&arg.name,
				annotation(arg.annotation.as_ref()),
				ParameterKind::KeywordOnly,
			)
			.with_default(default.as_ref().map(Expr::as_str)),
		);
	}

	if let Some(arg) = &args.kwarg {
		parameters.push(Parameter::new(
			&arg.name,
			annotation(arg.annotation.as_ref()),
			ParameterKind::VariadicKeyword,
		));
	}

	Ok(parameters)
}

fn annotation(expr: Option<&Expr>) -> Option<&str> {
	expr.map(Expr::as_str)
}

fn decorators(decorator_list: &[Expr]) -> Vec<String> {
	decorator_list.iter().map(|expr| format!("@{expr}")).collect()
}

/// The cleaned docstring of a body: its first statement, if that is a
/// string literal. Nothing past the first statement is considered.
fn docstring(body: &[Stmt]) -> Option<String> {
	match body.first() {
		Some(Stmt::Expr(expr)) => expr.string_value.as_deref().map(clean_docstring),
		_ => None,
	}
}

/// Normalise docstring indentation: expand tabs, left-trim the first line,
/// remove the common indentation of the remaining lines and drop leading
/// and trailing blank lines.
pub fn clean_docstring(raw: &str) -> String {
	let normalized = raw.replace("\r\n", "\n");
	let mut lines: Vec<String> = normalized.split('\n').map(expand_tabs).collect();

	let margin = lines
		.iter()
		.skip(1)
		.filter(|line| !line.trim_start().is_empty())
		.map(|line| line.len() - line.trim_start().len())
		.min();

	if let Some(first) = lines.first_mut() {
		*first = first.trim_start().to_string();
	}

	if let Some(margin) = margin {
		for line in lines.iter_mut().skip(1) {
			let stripped = line.get(margin..).unwrap_or_else(|| line.trim_start());
			*line = stripped.to_string();
		}
	}

	while lines.last().is_some_and(String::is_empty) {
		lines.pop();
	}

	let leading = lines.iter().take_while(|line| line.is_empty()).count();
	lines.drain(..leading);

	lines.join("\n")
}

fn expand_tabs(line: &str) -> String {
	if !line.contains('\t') {
		return line.to_string();
	}

	let mut expanded = String::with_capacity(line.len() + 8);
	let mut column = 0;

	for ch in line.chars() {
		if ch == '\t' {
			let width = 8 - column % 8;
			expanded.extend(std::iter::repeat_n(' ', width));
			column += width;
		} else {
			expanded.push(ch);
			column += 1;
		}
	}

	expanded
}
