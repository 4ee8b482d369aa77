//! Template configuration for rendered documentation.
//!
//! Every slot is a `minijinja` expression rendered against a small, fixed
//! context. Slots that are not overridden keep the Markdown layout below.

use serde::Deserialize;

/// Templates used when rendering a [`Callable`](crate::Callable).
///
/// | slot                 | variables                                     |
/// | -------------------- | --------------------------------------------- |
/// | `name`               | `heading`, `async_marker`, `owner_prefix`, `name` |
/// | `args_title`         | `heading`                                     |
/// | `parameter`          | `name`, `type_hint`, `default`                |
/// | `variadic_parameter` | `name`                                        |
/// | `returns_title`      | `heading`                                     |
/// | `return_type`        | `return_type`                                 |
/// | `description_title`  | `heading`                                     |
/// | `description`        | `docstring`                                   |
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionTemplate {
	pub name: String,
	pub args_title: String,
	pub parameter: String,
	pub variadic_parameter: String,
	pub returns_title: String,
	pub return_type: String,
	pub description_title: String,
	pub description: String,
}

impl Default for FunctionTemplate {
	fn default() -> Self {
		Self {
			name: "{{ heading }} `{{ async_marker }}{{ owner_prefix }}{{ name }}`".into(),
			args_title: "{{ heading }} Args:".into(),
			parameter: "- `{{ name }}`: `{{ type_hint }}` = `{{ default }}`".into(),
			variadic_parameter: "- `{{ name }}`".into(),
			returns_title: "{{ heading }} Returns:".into(),
			return_type: "- `{{ return_type }}`".into(),
			description_title: "{{ heading }} Description:".into(),
			description: "{{ docstring }}".into(),
		}
	}
}

/// Templates used when rendering a [`Type`](crate::Type).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeTemplate {
	/// Variables: `heading`, `name`.
	pub name: String,
	pub bases_title: String,
	/// Variables: `base`.
	pub base: String,
	pub decorators_title: String,
	/// Variables: `decorator`.
	pub decorator: String,
	pub methods_title: String,
	pub description_title: String,
	/// Variables: `docstring`.
	pub description: String,
}

impl Default for TypeTemplate {
	fn default() -> Self {
		Self {
			name: "{{ heading }} `class {{ name }}`".into(),
			bases_title: "{{ heading }} Bases:".into(),
			base: "- Bases: {{ base }}".into(),
			decorators_title: "{{ heading }} Decorators:".into(),
			decorator: "- {{ decorator }}".into(),
			methods_title: "{{ heading }} Methods:".into(),
			description_title: "{{ heading }} Description:".into(),
			description: "{{ docstring }}".into(),
		}
	}
}

/// Templates used when rendering a [`Module`](crate::Module).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleTemplate {
	/// Variables: `heading`, `name`.
	pub name: String,
	pub description_title: String,
	/// Variables: `docstring`.
	pub description: String,
	pub classes_title: String,
	pub functions_title: String,
}

impl Default for ModuleTemplate {
	fn default() -> Self {
		Self {
			name: "{{ heading }} Module: *{{ name }}*".into(),
			description_title: "{{ heading }} Description:".into(),
			description: "{{ docstring }}".into(),
			classes_title: "{{ heading }} Classes:".into(),
			functions_title: "{{ heading }} Functions:".into(),
		}
	}
}

/// The full template configuration, one template per symbol kind.
///
/// ```toml
/// [templates.function]
/// name = "{{ heading }} {{ name }}()"
///
/// [templates.type]
/// base = "- {{ base }}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Templates {
	pub function: FunctionTemplate,
	#[serde(rename = "type")]
	pub ty: TypeTemplate,
	pub module: ModuleTemplate,
}

impl Templates {
	/// Every slot paired with a unique template name, used to register the
	/// slots with a template environment.
	pub(crate) fn slots(&self) -> Vec<(&'static str, &str)> {
		let Self {
			function,
			ty,
			module,
		} = self;

		vec![
			(slot::FUNCTION_NAME, function.name.as_str()),
			(slot::FUNCTION_ARGS_TITLE, function.args_title.as_str()),
			(slot::FUNCTION_PARAMETER, function.parameter.as_str()),
			(
				slot::FUNCTION_VARIADIC_PARAMETER,
				function.variadic_parameter.as_str(),
			),
			(slot::FUNCTION_RETURNS_TITLE, function.returns_title.as_str()),
			(slot::FUNCTION_RETURN_TYPE, function.return_type.as_str()),
			(
				slot::FUNCTION_DESCRIPTION_TITLE,
				function.description_title.as_str(),
			),
			(slot::FUNCTION_DESCRIPTION, function.description.as_str()),
			(slot::TYPE_NAME, ty.name.as_str()),
			(slot::TYPE_BASES_TITLE, ty.bases_title.as_str()),
			(slot::TYPE_BASE, ty.base.as_str()),
			(slot::TYPE_DECORATORS_TITLE, ty.decorators_title.as_str()),
			(slot::TYPE_DECORATOR, ty.decorator.as_str()),
			(slot::TYPE_METHODS_TITLE, ty.methods_title.as_str()),
			(slot::TYPE_DESCRIPTION_TITLE, ty.description_title.as_str()),
			(slot::TYPE_DESCRIPTION, ty.description.as_str()),
			(slot::MODULE_NAME, module.name.as_str()),
			(
				slot::MODULE_DESCRIPTION_TITLE,
				module.description_title.as_str(),
			),
			(slot::MODULE_DESCRIPTION, module.description.as_str()),
			(slot::MODULE_CLASSES_TITLE, module.classes_title.as_str()),
			(slot::MODULE_FUNCTIONS_TITLE, module.functions_title.as_str()),
		]
	}
}

/// Names under which each slot is registered.
pub(crate) mod slot {
	pub const FUNCTION_NAME: &str = "function.name";
	pub const FUNCTION_ARGS_TITLE: &str = "function.args_title";
	pub const FUNCTION_PARAMETER: &str = "function.parameter";
	pub const FUNCTION_VARIADIC_PARAMETER: &str = "function.variadic_parameter";
	pub const FUNCTION_RETURNS_TITLE: &str = "function.returns_title";
	pub const FUNCTION_RETURN_TYPE: &str = "function.return_type";
	pub const FUNCTION_DESCRIPTION_TITLE: &str = "function.description_title";
	pub const FUNCTION_DESCRIPTION: &str = "function.description";
	pub const TYPE_NAME: &str = "type.name";
	pub const TYPE_BASES_TITLE: &str = "type.bases_title";
	pub const TYPE_BASE: &str = "type.base";
	pub const TYPE_DECORATORS_TITLE: &str = "type.decorators_title";
	pub const TYPE_DECORATOR: &str = "type.decorator";
	pub const TYPE_METHODS_TITLE: &str = "type.methods_title";
	pub const TYPE_DESCRIPTION_TITLE: &str = "type.description_title";
	pub const TYPE_DESCRIPTION: &str = "type.description";
	pub const MODULE_NAME: &str = "module.name";
	pub const MODULE_DESCRIPTION_TITLE: &str = "module.description_title";
	pub const MODULE_DESCRIPTION: &str = "module.description";
	pub const MODULE_CLASSES_TITLE: &str = "module.classes_title";
	pub const MODULE_FUNCTIONS_TITLE: &str = "module.functions_title";
}
