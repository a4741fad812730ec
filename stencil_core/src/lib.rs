//! `stencil_core` extracts named template blocks from text, keeps them in a
//! queryable library and renders them with caller-supplied slot values.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source text
//!   → Parser (line scanner for STARTTEMPLATE/ENDTEMPLATE markers)
//!   → Library (name-keyed store, duplicate policy on every add)
//!   → Engine (fingerprint → render cache → Template::render → nested renders)
//! ```
//!
//! ## Markup
//!
//! ```text
//! <%%STARTTEMPLATE greet%%>Hello, {{ name }}!<%%ENDTEMPLATE greet%%>
//!
//! <%%STARTTEMPLATE page%%>
//! {{> header }}
//! {{> card user }}
//! <%%ENDTEMPLATE page%%>
//! ```
//!
//! Inside a body, `{{ path }}` substitutes a slot (with `.key` access into
//! maps), `{{> name }}` renders another template with the same slots and
//! `{{> name path }}` renders it with the map found at `path`.
//!
//! ## Key Types
//!
//! - [`Engine`]: owns a [`Library`] and the render cache.
//! - [`Template`]: an immutable name and body.
//! - [`DuplicatePolicy`]: `Error`, `Overwrite` or `Ignore` on name collisions.
//! - [`Slots`] / [`Value`]: render inputs.
//! - [`StencilConfig`]: configuration loaded from `stencil.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use stencil_core::DuplicatePolicy;
//! use stencil_core::Engine;
//! use stencil_core::Slots;
//!
//! let mut engine = Engine::new();
//! engine
//! 	.parse(
//! 		"<%%STARTTEMPLATE greet%%>Hello, {{name}}!<%%ENDTEMPLATE greet%%>",
//! 		DuplicatePolicy::Error,
//! 	)
//! 	.unwrap();
//!
//! let slots = Slots::new().with("name", "World");
//! assert_eq!(engine.render("greet", &slots).unwrap(), "Hello, World!");
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use library::*;
pub use parser::*;
pub use template::*;
pub use tokens::*;
pub use value::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub(crate) mod lexer;
mod library;
mod parser;
mod template;
mod tokens;
mod value;

#[cfg(test)]
mod __fixtures;
