use std::path::Path;

use tracing::info;

use crate::{
    cargoutils,
    error::{DocketError, Result},
    index::{BuildOptions, DocIndex, build_package},
    render::HtmlRenderer,
    target::Target,
};

/// Docket builds static HTML API documentation for Rust crates.
///
/// Given an ordered list of module references, it resolves each reference
/// to a Cargo package, generates documentation data with the nightly
/// toolchain via rustdoc's JSON output, and renders the combined index to
/// a tree of static pages. Users must have the nightly Rust toolchain
/// installed and available.
#[derive(Debug, Clone)]
pub struct Docket {
    /// In offline mode Docket will not attempt to fetch dependencies from
    /// the network.
    offline: bool,

    /// Whether to include private items in the documentation.
    private_items: bool,

    /// Whether to build without default features.
    no_default_features: bool,

    /// Whether to build with all features.
    all_features: bool,

    /// Specific features to enable while building.
    features: Vec<String>,

    /// Whether to suppress output during processing.
    silent: bool,
}

impl Default for Docket {
    fn default() -> Self {
        Self::new()
    }
}

impl Docket {
    /// Creates a new Docket instance with default configuration.
    ///
    /// # Module Reference Format
    ///
    /// A module reference is an entrypoint, followed by an optional module
    /// path, with components separated by `::`:
    ///
    ///   entrypoint::path
    ///
    /// An entrypoint can be:
    ///
    /// - A path to a package directory or Rust file
    /// - A workspace member or dependency name
    /// - A registry package name, optionally versioned with `@`
    ///
    /// # Examples of valid module references:
    ///
    /// - ./
    /// - crates/mylib
    /// - mylib
    /// - mylib::services
    /// - serde
    /// - serde@1.0.104::de
    pub fn new() -> Self {
        Self {
            offline: false,
            private_items: false,
            no_default_features: false,
            all_features: false,
            features: Vec::new(),
            silent: false,
        }
    }

    /// Enables or disables offline mode, which prevents Docket from
    /// fetching dependencies from the network.
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Enables or disables documentation of private items.
    pub fn with_private_items(mut self, private_items: bool) -> Self {
        self.private_items = private_items;
        self
    }

    /// Enables or disables building without default features.
    pub fn with_no_default_features(mut self, no_default_features: bool) -> Self {
        self.no_default_features = no_default_features;
        self
    }

    /// Enables or disables building with all features.
    pub fn with_all_features(mut self, all_features: bool) -> Self {
        self.all_features = all_features;
        self
    }

    /// Sets the specific features to enable while building.
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    /// Enables or disables silent mode, which suppresses output during
    /// processing.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Build the documentation index for the given module references.
    ///
    /// References are resolved and documented strictly in input order.
    pub fn build_index(&self, modules: &[String]) -> Result<DocIndex> {
        if modules.is_empty() {
            return Err(DocketError::InvalidTarget(
                "at least one module reference is required".to_string(),
            ));
        }

        let options = BuildOptions {
            no_default_features: self.no_default_features,
            all_features: self.all_features,
            features: self.features.clone(),
            private_items: self.private_items,
            silent: self.silent,
        };

        let mut index = DocIndex::default();
        for spec in modules {
            let target = Target::parse(spec)?;
            let resolved = cargoutils::resolve(&target, self.offline)?;
            index.packages.push(build_package(&resolved, &options)?);
        }
        Ok(index)
    }

    /// Generate documentation for the given module references into
    /// `output_dir`.
    ///
    /// This is the end-to-end pipeline: build the index, then render it.
    /// Any failure propagates unmodified; partial output from a failed run
    /// is left in place.
    pub fn generate(&self, modules: &[String], output_dir: &Path) -> Result<()> {
        let index = self.build_index(modules)?;
        info!(
            packages = index.packages.len(),
            output = %output_dir.display(),
            "rendering documentation"
        );
        HtmlRenderer::new().render(&index, output_dir)
    }

    /// Returns the pretty-printed JSON form of the documentation index for
    /// the given module references.
    pub fn raw_json(&self, modules: &[String]) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.build_index(modules)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_module_list_is_rejected() {
        let err = Docket::new().build_index(&[]).unwrap_err();
        assert!(matches!(err, DocketError::InvalidTarget(_)));
    }

    #[test]
    fn malformed_reference_is_rejected() {
        let err = Docket::new()
            .build_index(&["mylib::".to_string()])
            .unwrap_err();
        assert!(matches!(err, DocketError::InvalidTarget(_)));
    }
}
