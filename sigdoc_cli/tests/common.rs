#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const SHAPES_SOURCE: &str = r#"
"""Geometry helpers."""


class Shape(Base):
    """A closed figure."""

    def area(self) -> float:
        return 0.0

    async def load(self, *, force: bool = False):
        pass


def perimeter(shape: Shape, scale=1.0) -> float:
    """Measure the outline."""
    return 0.0
"#;

pub fn sigdoc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("sigdoc"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("SIGDOC_LOG");
	cmd
}

/// Write `shapes.py` into `dir` and return its path.
pub fn write_shapes(dir: &Path) -> std::io::Result<PathBuf> {
	let path = dir.join("shapes.py");
	std::fs::write(&path, SHAPES_SOURCE)?;
	Ok(path)
}
