use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SigdocError {
	#[error(transparent)]
	#[diagnostic(code(sigdoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("syntax error at {line}:{column}: {message}")]
	#[diagnostic(
		code(sigdoc::syntax),
		help("sigdoc only documents source files that are syntactically valid")
	)]
	Syntax {
		message: String,
		line: usize,
		column: usize,
	},

	#[error("no module, type or callable was bound for rendering")]
	#[diagnostic(
		code(sigdoc::no_symbol),
		help("bind a symbol with `with_module`, `with_type` or `with_callable` before generating")
	)]
	NoSymbol,

	#[error("malformed parameter list for `{function}`: {reason}")]
	#[diagnostic(code(sigdoc::malformed_parameters))]
	MalformedParameters { function: String, reason: String },

	#[error("template rendering failed: {0}")]
	#[diagnostic(
		code(sigdoc::template_render),
		help("check the `[templates]` section of sigdoc.toml for unknown slots or invalid syntax")
	)]
	TemplateRender(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(sigdoc::config_parse),
		help(
			"check that sigdoc.toml is valid TOML with optional [templates.function], \
			 [templates.type] and [templates.module] sections"
		)
	)]
	ConfigParse(String),
}

impl SigdocError {
	pub(crate) fn syntax(message: impl Into<String>, position: crate::Point) -> Self {
		Self::Syntax {
			message: message.into(),
			line: position.line,
			column: position.column,
		}
	}
}

impl From<minijinja::Error> for SigdocError {
	fn from(error: minijinja::Error) -> Self {
		Self::TemplateRender(error.to_string())
	}
}

pub type SigdocResult<T> = Result<T, SigdocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
