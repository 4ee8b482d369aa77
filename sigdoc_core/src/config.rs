use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::SigdocError;
use crate::SigdocResult;
use crate::Templates;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["sigdoc.toml", ".sigdoc.toml", ".config/sigdoc.toml"];

/// Configuration loaded from a `sigdoc.toml` file.
///
/// ```toml
/// [templates.function]
/// name = "{{ heading }} `{{ name }}()`"
/// parameter = "- {{ name }} ({{ type_hint }}, default {{ default }})"
///
/// [templates.type]
/// base = "- extends `{{ base }}`"
///
/// [templates.module]
/// name = "{{ heading }} {{ name }}"
/// ```
///
/// Every key is optional. Slots that are not set keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigdocConfig {
	pub templates: Templates,
}

impl SigdocConfig {
	/// Resolve the config file path in `root` using supported candidates.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> SigdocResult<Option<Self>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load the config from an explicit path. A missing file is an error.
	pub fn load_file(path: &Path) -> SigdocResult<Self> {
		let content = std::fs::read_to_string(path)?;
		let config: Self =
			toml::from_str(&content).map_err(|e| SigdocError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %path.display(), "loaded config");

		Ok(config)
	}
}
