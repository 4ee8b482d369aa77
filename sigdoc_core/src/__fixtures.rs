use crate::Callable;
use crate::Module;
use crate::Parameter;
use crate::ParameterKind;
use crate::SigdocResult;
use crate::Type;
use crate::parse;
use crate::syntax::ClassDef;
use crate::syntax::FunctionDef;
use crate::syntax::Stmt;

pub const SIGNATURE_SOURCE: &str = r#"
def f(a: int, b: str = "x", *args, c: float, d: bool = True, **kw) -> None:
    pass
"#;

pub const SHAPES_SOURCE: &str = r#"
"""Geometry helpers.

    Shapes and the functions that measure them.
"""

import math


class Shape(Base, Generic[T], metaclass=ABCMeta):
    """A closed figure."""

    sides: int = 0

    @property
    def area(self) -> float:
        def helper():
            pass

        return 0.0

    class Inner:
        def hidden(self):
            pass

    if TYPE_CHECKING:
        def conditional(self):
            pass

    async def load(self, *, force: bool = False): ...


def perimeter(shape: Shape, scale=1.0) -> float:
    """Measure the outline."""
    def nested():
        pass
    return 0.0


@cache
async def fetch_all(*urls: str, **options) -> list[bytes]:
    return []
"#;

/// The first top-level function of `source`.
pub fn first_function(source: &str) -> SigdocResult<FunctionDef> {
	let root = parse(source)?;
	let def = root
		.body
		.into_iter()
		.find_map(|stmt| {
			match stmt {
				Stmt::FunctionDef(def) => Some(def),
				_ => None,
			}
		})
		.unwrap_or_else(|| panic!("no function in {source:?}"));

	Ok(def)
}

/// The first top-level class of `source`.
pub fn first_class(source: &str) -> SigdocResult<ClassDef> {
	let root = parse(source)?;
	let def = root
		.body
		.into_iter()
		.find_map(|stmt| {
			match stmt {
				Stmt::ClassDef(def) => Some(def),
				_ => None,
			}
		})
		.unwrap_or_else(|| panic!("no class in {source:?}"));

	Ok(def)
}

pub fn parameter(
	name: &str,
	type_hint: Option<&str>,
	default: Option<&str>,
	kind: ParameterKind,
) -> Parameter {
	Parameter::new(name, type_hint, kind).with_default(default)
}

/// `async def fetch(self, url: str) -> bytes` owned by `Client`.
pub fn fetch_method() -> Callable {
	Callable {
		name: "fetch".into(),
		parameters: vec![
			parameter("self", None, None, ParameterKind::Positional),
			parameter("url", Some("str"), None, ParameterKind::Positional),
		],
		return_type: Some("bytes".into()),
		docstring: None,
		decorators: vec![],
		is_async: true,
		owner_type_name: Some("Client".into()),
	}
}

/// A class with no bases and a single async method.
pub fn client_type() -> Type {
	Type {
		name: "Client".into(),
		base_expressions: vec![],
		methods: vec![fetch_method()],
		docstring: None,
		decorators: vec![],
	}
}

/// `def run()` without parameters, annotation or docstring.
pub fn run_function() -> Callable {
	Callable {
		name: "run".into(),
		parameters: vec![],
		return_type: None,
		docstring: None,
		decorators: vec![],
		is_async: false,
		owner_type_name: None,
	}
}

/// A module holding one undocumented function.
pub fn tools_module() -> Module {
	Module {
		name: "tools".into(),
		types: vec![],
		functions: vec![run_function()],
		docstring: None,
	}
}
