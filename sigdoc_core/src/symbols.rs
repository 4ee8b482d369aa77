//! The symbol model: plain records produced by extraction and consumed by
//! rendering. Records are never mutated once built.

use serde::Deserialize;
use serde::Serialize;

/// Type hint recorded for parameters without an annotation.
pub const DEFAULT_TYPE_HINT: &str = "Any";

/// How a parameter may be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
	/// Declared before `/`.
	PositionalOnly,
	/// Positional-or-keyword.
	Positional,
	/// `*args`
	VariadicPositional,
	/// Declared after `*` or `*args`.
	KeywordOnly,
	/// `**kwargs`
	VariadicKeyword,
}

impl ParameterKind {
	/// The prefix that tags a parameter name of this kind.
	pub fn marker(self) -> &'static str {
		match self {
			Self::VariadicPositional => "*",
			Self::VariadicKeyword => "**",
			Self::PositionalOnly | Self::Positional | Self::KeywordOnly => "",
		}
	}

	pub fn is_variadic(self) -> bool {
		matches!(self, Self::VariadicPositional | Self::VariadicKeyword)
	}
}

/// A single parameter of a [`Callable`].
///
/// Variadic parameters carry their marker in [`name`](Parameter::name)
/// (`*args`, `**kwargs`) and never have a default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
	/// The parameter name, prefixed with `*` or `**` when variadic.
	pub name: String,
	/// The annotation source text, or [`DEFAULT_TYPE_HINT`].
	pub type_hint: String,
	/// The default value source text. Present only for optional
	/// parameters.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_value: Option<String>,
	pub kind: ParameterKind,
}

impl Parameter {
	/// A parameter without a default. The name is tagged with the kind's
	/// marker.
	pub fn new(name: &str, type_hint: Option<&str>, kind: ParameterKind) -> Self {
		Self {
			name: format!("{}{name}", kind.marker()),
			type_hint: type_hint.unwrap_or(DEFAULT_TYPE_HINT).to_string(),
			default_value: None,
			kind,
		}
	}

	/// Attach a default value. Variadic parameters ignore it.
	#[must_use]
	pub fn with_default(mut self, default_value: Option<&str>) -> Self {
		if !self.kind.is_variadic() {
			self.default_value = default_value.map(str::to_string);
		}
		self
	}

	pub fn is_variadic(&self) -> bool {
		self.kind.is_variadic()
	}
}

/// A function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
	pub name: String,
	/// Parameters in declaration order.
	pub parameters: Vec<Parameter>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub return_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub docstring: Option<String>,
	/// Decorator expressions with their leading `@`, in lexical order.
	#[serde(default)]
	pub decorators: Vec<String>,
	#[serde(default)]
	pub is_async: bool,
	/// The name of the owning type for methods.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner_type_name: Option<String>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
	pub name: String,
	/// Inheritance-list expressions in declared order.
	#[serde(default)]
	pub base_expressions: Vec<String>,
	/// Directly declared methods in declaration order. Each has
	/// `owner_type_name` set to this type's name.
	#[serde(default)]
	pub methods: Vec<Callable>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub docstring: Option<String>,
	#[serde(default)]
	pub decorators: Vec<String>,
}

/// One source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
	pub name: String,
	/// Top-level classes in declaration order.
	#[serde(default)]
	pub types: Vec<Type>,
	/// Top-level functions in declaration order.
	#[serde(default)]
	pub functions: Vec<Callable>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub docstring: Option<String>,
}

/// Any extracted symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "symbol", rename_all = "snake_case")]
pub enum Symbol {
	Module(Module),
	Type(Type),
	Callable(Callable),
}

impl Symbol {
	pub fn name(&self) -> &str {
		match self {
			Self::Module(module) => &module.name,
			Self::Type(ty) => &ty.name,
			Self::Callable(callable) => &callable.name,
		}
	}

	pub fn view(&self) -> SymbolRef<'_> {
		match self {
			Self::Module(module) => SymbolRef::Module(module),
			Self::Type(ty) => SymbolRef::Type(ty),
			Self::Callable(callable) => SymbolRef::Callable(callable),
		}
	}
}

/// A borrowed view of a symbol, used when walking the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRef<'a> {
	Module(&'a Module),
	Type(&'a Type),
	Callable(&'a Callable),
}

impl<'a> From<&'a Module> for SymbolRef<'a> {
	fn from(module: &'a Module) -> Self {
		Self::Module(module)
	}
}

impl<'a> From<&'a Type> for SymbolRef<'a> {
	fn from(ty: &'a Type) -> Self {
		Self::Type(ty)
	}
}

impl<'a> From<&'a Callable> for SymbolRef<'a> {
	fn from(callable: &'a Callable) -> Self {
		Self::Callable(callable)
	}
}

impl<'a> From<&'a Symbol> for SymbolRef<'a> {
	fn from(symbol: &'a Symbol) -> Self {
		symbol.view()
	}
}
