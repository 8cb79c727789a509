//! Page templates.
//!
//! Every page shares the same chrome: a header with a home link, a sidebar
//! listing the documented packages, and a main content section. Links are
//! relative; `depth` counts directory levels below the output root.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    error::Result,
    highlight,
    index::{DocIndex, ItemDocs, ModulePage, PackageDocs},
    markdown,
};

/// Relative prefix from a page `depth` levels below the output root.
fn prefix(depth: usize) -> String {
    "../".repeat(depth)
}

/// Relative href of the module at `path` inside `package`.
fn module_href(depth: usize, package: &PackageDocs, path: &[String]) -> String {
    let mut parts = vec![package.name.clone()];
    parts.extend(path.iter().cloned());
    format!("{}{}/index.html", prefix(depth), parts.join("/"))
}

/// The entry page: documented packages and their top-level modules.
pub(crate) fn index_page(index: &DocIndex) -> Markup {
    let content = html! {
        section class="main-section" {
            h1 class="section-header" { "API Documentation" }
            ul class="package-list" {
                @for package in &index.packages {
                    li {
                        a href=(module_href(0, package, &package.root.path)) {
                            (package.name)
                        }
                        @if let Some(version) = &package.version {
                            span class="version" { (version) }
                        }
                    }
                }
            }
        }
    };
    chrome("API Documentation", 0, index, content)
}

/// A module page: docstring, child modules, then item sections.
pub(crate) fn module_page(
    package: &PackageDocs,
    module: &ModulePage,
    index: &DocIndex,
    depth: usize,
) -> Result<Markup> {
    let title = if module.path.is_empty() {
        format!("Crate {}", package.name)
    } else {
        format!("Module {}::{}", package.name, module.path.join("::"))
    };

    let mut rendered_items: Vec<(&ItemDocs, Option<String>)> = Vec::new();
    for item in &module.items {
        let decl = match &item.decl {
            Some(decl) => Some(highlight::highlight_decl(decl)?),
            None => None,
        };
        rendered_items.push((item, decl));
    }

    let content = html! {
        section class="main-section" {
            h1 class="section-header" { (title) }
            @if let Some(docs) = &module.docs {
                div class="docblock" { (PreEscaped(markdown::docs_html(docs))) }
            }
            @if !module.modules.is_empty() {
                h2 class="section-title" { "Modules" }
                ul class="module-list" {
                    @for child in &module.modules {
                        li {
                            a href=(format!("{}/index.html", child.name)) { (child.name) }
                        }
                    }
                }
            }
            @for (section, entries) in sections(&rendered_items) {
                h2 class="section-title" { (section) }
                @for (item, decl) in entries {
                    article class="item" id=(item.name) {
                        h3 class="item-name" { (item.name) }
                        @if let Some(decl) = decl {
                            pre class="decl" { code { (PreEscaped(decl.clone())) } }
                        }
                        @if let Some(docs) = &item.docs {
                            div class="docblock" { (PreEscaped(markdown::docs_html(docs))) }
                        }
                    }
                }
            }
        }
    };

    Ok(chrome(&title, depth, index, content))
}

/// Group the sorted item list into its page sections.
fn sections<'a>(
    items: &'a [(&'a ItemDocs, Option<String>)],
) -> Vec<(&'static str, Vec<&'a (&'a ItemDocs, Option<String>)>)> {
    let mut grouped: Vec<(&'static str, Vec<_>)> = Vec::new();
    for entry in items {
        let section = entry.0.kind.section();
        match grouped.last_mut() {
            Some((current, bucket)) if *current == section => bucket.push(entry),
            _ => grouped.push((section, vec![entry])),
        }
    }
    grouped
}

/// Shared page skeleton.
fn chrome(title: &str, depth: usize, index: &DocIndex, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            (head(title, depth))
            body {
                (header(depth))
                main {
                    (sidebar(index, depth))
                    (content)
                }
            }
        }
    }
}

fn head(title: &str, depth: usize) -> Markup {
    let prefix = prefix(depth);
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            title { (title) }
            link rel="stylesheet" type="text/css" href=(format!("{prefix}static/css/docket.css"));
            link rel="stylesheet" type="text/css" href=(format!("{prefix}static/css/highlight.css"));
        }
    }
}

fn header(depth: usize) -> Markup {
    html! {
        header {
            a href=(format!("{}index.html", prefix(depth))) class="header-home" {
                "docket"
            }
        }
    }
}

fn sidebar(index: &DocIndex, depth: usize) -> Markup {
    html! {
        nav class="sidebar" {
            @for package in &index.packages {
                div class="block" {
                    h3 {
                        a href=(module_href(depth, package, &package.root.path)) {
                            (package.name)
                        }
                    }
                    @if !package.root.modules.is_empty() {
                        ul {
                            @for module in &package.root.modules {
                                li {
                                    a href=(module_href(depth, package, &module.path)) {
                                        (module.name)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ItemKind;

    fn sample_index() -> DocIndex {
        DocIndex {
            packages: vec![PackageDocs {
                name: "mylib".to_string(),
                version: Some("0.3.1".to_string()),
                root: ModulePage {
                    name: "mylib".to_string(),
                    path: vec![],
                    docs: Some("Engine bindings.".to_string()),
                    items: vec![ItemDocs {
                        kind: ItemKind::Function,
                        name: "frame_count".to_string(),
                        decl: Some("pub fn frame_count() -> u32".to_string()),
                        docs: Some("Number of rendered frames.".to_string()),
                    }],
                    modules: vec![ModulePage {
                        name: "services".to_string(),
                        path: vec!["services".to_string()],
                        docs: None,
                        items: vec![],
                        modules: vec![],
                    }],
                },
            }],
        }
    }

    #[test]
    fn index_page_links_packages() {
        let index = sample_index();
        let html = index_page(&index).into_string();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("href=\"mylib/index.html\""));
        assert!(html.contains("0.3.1"));
    }

    #[test]
    fn module_page_renders_items_and_docs() {
        let index = sample_index();
        let package = &index.packages[0];
        let html = module_page(package, &package.root, &index, 1)
            .unwrap()
            .into_string();
        assert!(html.contains("Crate mylib"));
        assert!(html.contains("<p>Engine bindings.</p>"));
        assert!(html.contains("Functions"));
        assert!(html.contains("id=\"frame_count\""));
        assert!(html.contains("href=\"services/index.html\""));
        // Stylesheet links are depth-relative.
        assert!(html.contains("../static/css/docket.css"));
    }

    #[test]
    fn submodule_title_uses_module_path() {
        let index = sample_index();
        let package = &index.packages[0];
        let services = &package.root.modules[0];
        let html = module_page(package, services, &index, 2)
            .unwrap()
            .into_string();
        assert!(html.contains("Module mylib::services"));
    }
}
