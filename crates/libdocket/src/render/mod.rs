//! Renders a documentation index to a static HTML tree.
//!
//! The output layout is one directory per module with an `index.html`
//! inside, a top-level entry page, and a `static/` directory of
//! stylesheets:
//!
//! ```text
//! html/
//!   index.html
//!   static/css/docket.css
//!   static/css/highlight.css
//!   mylib/index.html
//!   mylib/services/index.html
//! ```
//!
//! Rendering is deterministic: the index is already sorted, and pages are
//! written in traversal order.

mod assets;
mod page;

use std::fs;
use std::path::{Path, PathBuf};

use maud::Markup;
use tracing::{debug, info};

use crate::{
    error::{DocketError, Result},
    index::{DocIndex, ModulePage, PackageDocs},
};

/// Writes documentation indexes as static HTML.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {}

impl HtmlRenderer {
    /// Creates a renderer with default settings.
    pub fn new() -> Self {
        Self {}
    }

    /// Render `index` into `output_dir`, creating it if necessary.
    pub fn render(&self, index: &DocIndex, output_dir: &Path) -> Result<()> {
        fs::create_dir_all(output_dir).map_err(|e| render_error(output_dir, &e))?;
        assets::write_static_files(output_dir)?;

        write_page(&output_dir.join("index.html"), page::index_page(index))?;

        for package in &index.packages {
            self.render_module(package, &package.root, index, output_dir)?;
        }

        info!(output = %output_dir.display(), "documentation written");
        Ok(())
    }

    fn render_module(
        &self,
        package: &PackageDocs,
        module: &ModulePage,
        index: &DocIndex,
        output_dir: &Path,
    ) -> Result<()> {
        let dir = module_dir(output_dir, package, module);
        fs::create_dir_all(&dir).map_err(|e| render_error(&dir, &e))?;

        let depth = 1 + module.path.len();
        let markup = page::module_page(package, module, index, depth)?;
        write_page(&dir.join("index.html"), markup)?;
        debug!(module = %module.name, "rendered module page");

        for child in &module.modules {
            self.render_module(package, child, index, output_dir)?;
        }
        Ok(())
    }
}

/// Directory a module page is written into.
fn module_dir(output_dir: &Path, package: &PackageDocs, module: &ModulePage) -> PathBuf {
    let mut dir = output_dir.join(&package.name);
    for segment in &module.path {
        dir.push(segment);
    }
    dir
}

fn write_page(path: &Path, markup: Markup) -> Result<()> {
    fs::write(path, markup.into_string()).map_err(|e| render_error(path, &e))
}

fn render_error(path: &Path, err: &std::io::Error) -> DocketError {
    DocketError::Render {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
