//! `readmix_core` is the core library for [readmix](https://github.com/readmix/readmix).
//! It builds a package registry readme from a repository readme: named blocks
//! are reused between the two documents and markdown that only renders on the
//! code-hosting site is rewritten into markdown the registry understands.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source readme + registry template
//!   → Block resolver (replaces `{{ name }}` with `<!-- name -->…<!-- name -->` blocks)
//!   → Dialect converter (emoji, task lists, images, details, badges, admonitions, anchors)
//!   → Generated readme on disk
//!   → Publish state manager (stages it as README.md, restores the original afterwards)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Configuration loading from `readmix.toml`.
//! - [`publish`] — Backup, swap and restore of the working readme.
//!
//! ## Key Types
//!
//! - [`Document`] — The text of a markdown file.
//! - [`Placeholder`] — A `{{ name }}` reference in a template.
//! - [`DialectConverter`] — The ordered markdown rewrite rules.
//! - [`PublishStateManager`] — The prepare/restore lifecycle.
//! - [`Pipeline`] — Reads inputs, converts, and writes or checks the output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use readmix_core::DialectConverter;
//! use readmix_core::DialectOptions;
//! use readmix_core::generate_document;
//!
//! let source = "<!-- INTRO -->\nHello world\n<!-- INTRO -->";
//! let template = "# my-package\n\n{{ INTRO }}\n";
//! let converter = DialectConverter::new(DialectOptions::new("https://github.com/owner/repo"));
//!
//! let generated = generate_document(source, template, &converter);
//! assert_eq!(generated.content, "# my-package\n\nHello world\n");
//! ```

pub use blocks::*;
pub use config::*;
pub use dialect::*;
pub use document::*;
pub use engine::*;
pub use error::*;
pub use publish::*;

mod blocks;
pub mod config;
mod dialect;
mod document;
mod engine;
#[allow(unused_assignments)]
mod error;
pub(crate) mod lexer;
pub mod publish;
