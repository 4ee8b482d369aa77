//! The generic syntax tree the extractors read.
//!
//! The tree only models what symbol extraction needs: declarations, their
//! parameter lists, string expression statements (docstring candidates) and
//! opaque statements that may own nested bodies. Expressions are kept as
//! their canonical source text.

use std::fmt::Display;

use crate::Point;

/// The root of one source unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRoot {
	pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
	/// `def` or `async def`.
	FunctionDef(FunctionDef),
	/// `class`.
	ClassDef(ClassDef),
	/// A statement consisting of a single expression.
	Expr(Expr),
	/// Any other statement. Compound statements keep their nested body so
	/// that nothing inside them is mistaken for a direct member.
	Other { body: Vec<Stmt> },
}

impl Stmt {
	/// The declaration this statement introduces, if any.
	pub fn declaration(&self) -> Option<Declaration<'_>> {
		match self {
			Self::FunctionDef(def) => Some(def.declaration()),
			Self::ClassDef(def) => Some(Declaration::ClassLike(def)),
			Self::Expr(_) | Self::Other { .. } => None,
		}
	}
}

/// Whether a function-like declaration is synchronous or asynchronous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FunctionKind {
	#[default]
	Sync,
	Async,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
	pub kind: FunctionKind,
	pub name: String,
	pub args: Arguments,
	/// The return annotation, if any.
	pub returns: Option<Expr>,
	pub body: Vec<Stmt>,
	/// Decorator expressions in lexical order, without the `@`.
	pub decorator_list: Vec<Expr>,
	/// Position of the `def` (or `async`) keyword.
	pub position: Point,
}

impl FunctionDef {
	pub fn declaration(&self) -> Declaration<'_> {
		match self.kind {
			FunctionKind::Sync => Declaration::FunctionLike(self),
			FunctionKind::Async => Declaration::AsyncFunctionLike(self),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
	pub name: String,
	/// Positional entries of the inheritance list, in declared order.
	pub bases: Vec<Expr>,
	/// Keyword entries of the inheritance list, e.g. `metaclass=ABCMeta`.
	pub keywords: Vec<Expr>,
	pub body: Vec<Stmt>,
	pub decorator_list: Vec<Expr>,
	pub position: Point,
}

/// The parameter lists of a function-like declaration.
///
/// `defaults` belong to the trailing run of `posonlyargs` followed by
/// `args`. `kw_defaults` pairs index-for-index with `kwonlyargs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
	pub posonlyargs: Vec<Arg>,
	pub args: Vec<Arg>,
	pub defaults: Vec<Expr>,
	pub vararg: Option<Arg>,
	pub kwonlyargs: Vec<Arg>,
	pub kw_defaults: Vec<Option<Expr>>,
	pub kwarg: Option<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
	pub name: String,
	pub annotation: Option<Expr>,
}

impl Arg {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			annotation: None,
		}
	}

	pub fn annotated(name: impl Into<String>, annotation: Expr) -> Self {
		Self {
			name: name.into(),
			annotation: Some(annotation),
		}
	}
}

/// An expression, held as canonical source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
	/// Canonical source text of the expression.
	pub text: String,
	/// The decoded value when the expression is a plain string literal
	/// (implicit concatenation included, bytes and f-strings excluded).
	pub string_value: Option<String>,
}

impl Expr {
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			string_value: None,
		}
	}

	pub fn string(text: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			string_value: Some(value.into()),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}
}

impl Display for Expr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.text)
	}
}

/// The declaration kinds the extractors dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration<'a> {
	ModuleRoot(&'a ModuleRoot),
	ClassLike(&'a ClassDef),
	FunctionLike(&'a FunctionDef),
	AsyncFunctionLike(&'a FunctionDef),
}

impl<'a> From<&'a ModuleRoot> for Declaration<'a> {
	fn from(root: &'a ModuleRoot) -> Self {
		Self::ModuleRoot(root)
	}
}

impl<'a> From<&'a ClassDef> for Declaration<'a> {
	fn from(def: &'a ClassDef) -> Self {
		Self::ClassLike(def)
	}
}

impl<'a> From<&'a FunctionDef> for Declaration<'a> {
	fn from(def: &'a FunctionDef) -> Self {
		def.declaration()
	}
}
