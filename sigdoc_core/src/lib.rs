//! `sigdoc_core` is the core library for sigdoc. It turns the declared structure of Python source (modules, classes, functions and their parameters) into a symbol model, then renders that model into Markdown reference documentation through configurable templates.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Python source file
//!   -> Lexer (logos tokens grouped into logical lines with indentation)
//!   -> Parser (indentation-aware statements into a generic syntax tree)
//!   -> Extractors (module, type, callable and parameter records)
//!   -> Renderer (minijinja templates, one line per element)
//!   -> write_lines (overwrites the destination)
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading from `sigdoc.toml`, which overrides any subset of the template slots.
//! - [`syntax`] - The generic syntax tree handed to the extractors.
//!
//! ## Key Types
//!
//! - [`Module`], [`Type`], [`Callable`] and [`Parameter`] - The immutable symbol model.
//! - [`Templates`] - Function, type and module templates with named slots.
//! - [`Renderer`] - Renders any symbol at a given heading level.
//! - [`Generator`] - Binds one symbol and renders it as a standalone document.
//! - [`SigdocConfig`] - Configuration loaded from `sigdoc.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sigdoc_core::Generator;
//! use sigdoc_core::Templates;
//! use sigdoc_core::extract_file;
//!
//! let module = extract_file("src/shapes.py").unwrap();
//! let generator = Generator::new(Templates::default()).with_module(module);
//! generator.generate_to("shapes.md").unwrap();
//! ```

pub use config::*;
pub use error::*;
pub use extract::*;
pub use parser::*;
pub use position::*;
pub use render::*;
pub use symbols::*;
pub use template::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
mod extract;
pub(crate) mod lexer;
mod parser;
mod position;
mod render;
mod symbols;
pub mod syntax;
mod template;
pub(crate) mod tokens;

#[cfg(test)]
mod __fixtures;
