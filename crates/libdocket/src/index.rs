//! The documentation index.
//!
//! An index aggregates the API surface of one or more documented packages.
//! Each package is built by running rustdoc with JSON output against its
//! resolved directory, deserializing the result, and walking the item graph
//! from the crate root into a deterministic page tree.

use std::fs;

use rust_format::{Formatter, RustFmt};
use rustdoc_types::{Crate, Item, ItemEnum, Visibility};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    cargoutils::{CargoPath, ResolvedTarget},
    decl,
    error::{DocketError, Result},
};

/// Options controlling how package documentation data is generated.
#[derive(Debug, Clone, Default)]
pub(crate) struct BuildOptions {
    /// Build without default features.
    pub no_default_features: bool,
    /// Build with all features enabled.
    pub all_features: bool,
    /// Specific features to enable.
    pub features: Vec<String>,
    /// Include private items.
    pub private_items: bool,
    /// Suppress rustdoc build output.
    pub silent: bool,
}

/// The aggregated documentation index for one invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocIndex {
    /// Documented packages, in input order.
    pub packages: Vec<PackageDocs>,
}

/// Documentation for a single resolved package.
#[derive(Debug, Clone, Serialize)]
pub struct PackageDocs {
    /// Crate name as it appears in the documentation data.
    pub name: String,
    /// Crate version, when rustdoc reports one.
    pub version: Option<String>,
    /// Root of the documented module tree. When the module reference named
    /// a submodule, this is that submodule rather than the crate root.
    pub root: ModulePage,
}

/// One module's worth of documentation.
#[derive(Debug, Clone, Serialize)]
pub struct ModulePage {
    /// Module name; the crate name for the root module.
    pub name: String,
    /// Module path components from the package root, empty for the root.
    pub path: Vec<String>,
    /// Raw docstring markdown, if any.
    pub docs: Option<String>,
    /// Non-module items declared here, sorted by kind then name.
    pub items: Vec<ItemDocs>,
    /// Child modules, sorted by name.
    pub modules: Vec<ModulePage>,
}

/// Documentation for a single non-module item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDocs {
    /// What kind of item this is.
    pub kind: ItemKind,
    /// Item name.
    pub name: String,
    /// Normalized declaration snippet, when the kind carries one.
    pub decl: Option<String>,
    /// Raw docstring markdown, if any.
    pub docs: Option<String>,
}

/// Item kinds shown on module pages, in page section order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A struct declaration.
    Struct,
    /// An enum declaration.
    Enum,
    /// A trait declaration.
    Trait,
    /// A free function.
    Function,
    /// A type alias.
    TypeAlias,
    /// A constant.
    Constant,
    /// A static.
    Static,
    /// A declarative macro.
    Macro,
}

impl ItemKind {
    /// Section heading used on module pages.
    pub fn section(&self) -> &'static str {
        match self {
            Self::Struct => "Structs",
            Self::Enum => "Enums",
            Self::Trait => "Traits",
            Self::Function => "Functions",
            Self::TypeAlias => "Type Aliases",
            Self::Constant => "Constants",
            Self::Static => "Statics",
            Self::Macro => "Macros",
        }
    }

    fn of(item: &Item) -> Option<Self> {
        match &item.inner {
            ItemEnum::Struct(_) => Some(Self::Struct),
            ItemEnum::Enum(_) => Some(Self::Enum),
            ItemEnum::Trait(_) => Some(Self::Trait),
            ItemEnum::Function(_) => Some(Self::Function),
            ItemEnum::TypeAlias(_) => Some(Self::TypeAlias),
            ItemEnum::Constant { .. } => Some(Self::Constant),
            ItemEnum::Static(_) => Some(Self::Static),
            ItemEnum::Macro(_) => Some(Self::Macro),
            _ => None,
        }
    }
}

/// Build the documentation for one resolved module reference.
pub(crate) fn build_package(
    target: &ResolvedTarget,
    options: &BuildOptions,
) -> Result<PackageDocs> {
    let krate = read_crate(&target.package_path, options)?;
    let root_item = krate
        .index
        .get(&krate.root)
        .ok_or_else(|| DocketError::Generate("crate root missing from documentation data".to_string()))?;
    let name = root_item
        .name
        .clone()
        .unwrap_or_else(|| "crate".to_string());

    info!(package = %name, "building documentation index");

    let start = descend(&krate, root_item, &target.filter)?;
    let root = module_page(start, target.filter.clone(), &krate, options)?;

    Ok(PackageDocs {
        name,
        version: krate.crate_version.clone(),
        root,
    })
}

/// Run rustdoc with JSON output and deserialize the result.
fn read_crate(package: &CargoPath, options: &BuildOptions) -> Result<Crate> {
    debug!(manifest = %package.manifest_path().display(), "generating rustdoc JSON");
    let json_path = rustdoc_json::Builder::default()
        .toolchain("nightly")
        .manifest_path(package.manifest_path())
        .document_private_items(options.private_items)
        .no_default_features(options.no_default_features)
        .all_features(options.all_features)
        .features(&options.features)
        .quiet(options.silent)
        .silent(options.silent)
        .build()
        .map_err(|e| DocketError::Generate(e.to_string()))?;
    let json = fs::read_to_string(&json_path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Walk from the crate root to the module selected by the filter path.
fn descend<'a>(krate: &'a Crate, root: &'a Item, filter: &[String]) -> Result<&'a Item> {
    let mut current = root;
    for segment in filter {
        let ItemEnum::Module(module) = &current.inner else {
            return Err(DocketError::ModuleNotFound(format!(
                "{} is not a module",
                current.name.as_deref().unwrap_or("item")
            )));
        };
        current = module
            .items
            .iter()
            .filter_map(|id| krate.index.get(id))
            .find(|item| {
                matches!(&item.inner, ItemEnum::Module(_))
                    && item.name.as_deref() == Some(segment)
            })
            .ok_or_else(|| {
                DocketError::ModuleNotFound(format!(
                    "module {segment} not found in {}",
                    current.name.as_deref().unwrap_or("crate")
                ))
            })?;
    }
    Ok(current)
}

fn module_page(
    item: &Item,
    path: Vec<String>,
    krate: &Crate,
    options: &BuildOptions,
) -> Result<ModulePage> {
    let ItemEnum::Module(module) = &item.inner else {
        return Err(DocketError::Generate("expected a module item".to_string()));
    };

    let mut items = Vec::new();
    let mut modules = Vec::new();

    for id in &module.items {
        let Some(child) = krate.index.get(id) else {
            continue;
        };
        if !visible(child, options.private_items) {
            continue;
        }
        match &child.inner {
            ItemEnum::Module(_) => {
                let mut child_path = path.clone();
                child_path.push(child.name.clone().unwrap_or_default());
                modules.push(module_page(child, child_path, krate, options)?);
            }
            ItemEnum::Use(use_) => {
                // Non-glob re-exports of local items surface under the
                // re-exporting module, one level deep.
                if use_.is_glob {
                    continue;
                }
                let Some(target_id) = &use_.id else { continue };
                let Some(target) = krate.index.get(target_id) else {
                    continue;
                };
                if matches!(&target.inner, ItemEnum::Module(_)) {
                    continue;
                }
                if let Some(mut docs) = item_docs(target, krate)? {
                    docs.name = use_.name.clone();
                    items.push(docs);
                }
            }
            _ => {
                if let Some(docs) = item_docs(child, krate)? {
                    items.push(docs);
                }
            }
        }
    }

    items.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    items.dedup_by(|a, b| a.kind == b.kind && a.name == b.name);
    modules.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(ModulePage {
        name: item.name.clone().unwrap_or_default(),
        path,
        docs: item.docs.clone(),
        items,
        modules,
    })
}

fn visible(item: &Item, private_items: bool) -> bool {
    private_items || matches!(item.visibility, Visibility::Public)
}

fn item_docs(item: &Item, krate: &Crate) -> Result<Option<ItemDocs>> {
    let Some(kind) = ItemKind::of(item) else {
        return Ok(None);
    };
    let decl = match decl::declaration(item, krate) {
        Some(raw) => Some(tidy_decl(kind, &raw)?),
        None => None,
    };
    Ok(Some(ItemDocs {
        kind,
        name: decl::name(item),
        decl,
        docs: item.docs.clone(),
    }))
}

/// Normalize a declaration snippet through rustfmt.
///
/// Free functions get a placeholder body for parsing and lose it again
/// afterwards; macro sources pass through untouched.
fn tidy_decl(kind: ItemKind, raw: &str) -> Result<String> {
    match kind {
        ItemKind::Macro => Ok(raw.trim_end().to_string()),
        ItemKind::Function => {
            let formatted = RustFmt::default().format_str(format!("{raw} {{}}"))?;
            let trimmed = formatted.trim_end();
            Ok(trimmed
                .strip_suffix("{}")
                .map_or_else(|| trimmed.to_string(), |sig| sig.trim_end().to_string()))
        }
        _ => Ok(RustFmt::default().format_str(raw)?.trim_end().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tidy_decl_function_loses_placeholder_body() {
        let tidied = tidy_decl(
            ItemKind::Function,
            "pub fn frame_count(window: &Window) -> u32",
        )
        .unwrap();
        assert_eq!(tidied, "pub fn frame_count(window: &Window) -> u32");
    }

    #[test]
    fn test_tidy_decl_struct_is_formatted() {
        let tidied = tidy_decl(
            ItemKind::Struct,
            "pub struct Draw { pub width : u32 , pub height : u32 }",
        )
        .unwrap();
        assert_eq!(
            tidied,
            "pub struct Draw {\n    pub width: u32,\n    pub height: u32,\n}"
        );
    }

    #[test]
    fn test_tidy_decl_macro_passes_through() {
        let source = "macro_rules! services { () => {}; }";
        assert_eq!(tidy_decl(ItemKind::Macro, source).unwrap(), source);
    }

    #[test]
    fn test_item_kind_section_order() {
        let mut kinds = vec![ItemKind::Macro, ItemKind::Function, ItemKind::Struct];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![ItemKind::Struct, ItemKind::Function, ItemKind::Macro]
        );
    }
}
