//! Docket generates static HTML API documentation for Rust crates.
//!
//! Given an ordered list of module references, Docket resolves each one to
//! a Cargo package, builds a documentation index from rustdoc's JSON
//! output, and renders the index to a navigable tree of static pages: an
//! entry page, one page per module with declaration snippets and rendered
//! docstrings, and a directory of stylesheets.
//!
//! Docket works by first resolving module references through Cargo (the
//! enclosing package, workspace members, dependencies, or the registry),
//! then using the nightly Rust toolchain to generate JSON documentation
//! data. Declaration snippets are normalized with rustfmt and syntax
//! highlighted. You must have the nightly Rust toolchain installed to use
//! (but not to install) Docket.

mod cargoutils;
mod decl;
mod docket;
mod error;
mod highlight;
mod index;
mod keywords;
mod markdown;
mod render;
mod target;
mod toolchain;

pub use crate::{
    docket::Docket,
    error::{DocketError, Result},
    index::{DocIndex, ItemDocs, ItemKind, ModulePage, PackageDocs},
    render::HtmlRenderer,
    target::{Entrypoint, Target},
    toolchain::ensure_nightly,
};
