//! End-to-end rendering tests over a prebuilt documentation index.

use std::fs;
use std::path::Path;

use libdocket::{DocIndex, DocketError, HtmlRenderer, ItemDocs, ItemKind, ModulePage, PackageDocs};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn engine_index() -> DocIndex {
    DocIndex {
        packages: vec![PackageDocs {
            name: "enginekit".to_string(),
            version: Some("0.1.0".to_string()),
            root: ModulePage {
                name: "enginekit".to_string(),
                path: vec![],
                docs: Some("Engine scripting bindings.".to_string()),
                items: vec![
                    ItemDocs {
                        kind: ItemKind::Struct,
                        name: "Engine".to_string(),
                        decl: Some("pub struct Engine {\n    pub running: bool,\n}".to_string()),
                        docs: Some("The engine root object.".to_string()),
                    },
                    ItemDocs {
                        kind: ItemKind::Function,
                        name: "version".to_string(),
                        decl: Some("pub fn version() -> &'static str".to_string()),
                        docs: None,
                    },
                ],
                modules: vec![ModulePage {
                    name: "services".to_string(),
                    path: vec!["services".to_string()],
                    docs: Some("Service registry and lookup.".to_string()),
                    items: vec![ItemDocs {
                        kind: ItemKind::Trait,
                        name: "Service".to_string(),
                        decl: Some(
                            "pub trait Service {\n    fn name(&self) -> &str;\n}".to_string(),
                        ),
                        docs: Some("Implemented by every engine service.".to_string()),
                    }],
                    modules: vec![],
                }],
            },
        }],
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

#[test]
fn renders_entry_page_and_module_tree() {
    let out = tempdir().unwrap();
    let output = out.path().join("html");

    HtmlRenderer::new()
        .render(&engine_index(), &output)
        .unwrap();

    // The entry page and one page per module exist.
    assert!(output.join("index.html").exists());
    assert!(output.join("enginekit").join("index.html").exists());
    assert!(
        output
            .join("enginekit")
            .join("services")
            .join("index.html")
            .exists()
    );

    // Stylesheets land under static/css.
    assert!(output.join("static").join("css").join("docket.css").exists());
    assert!(
        output
            .join("static")
            .join("css")
            .join("highlight.css")
            .exists()
    );

    let entry = read(&output.join("index.html"));
    assert!(entry.contains("href=\"enginekit/index.html\""));

    let root_page = read(&output.join("enginekit").join("index.html"));
    assert!(root_page.contains("Crate enginekit"));
    assert!(root_page.contains("<p>Engine scripting bindings.</p>"));
    assert!(root_page.contains("id=\"Engine\""));
    assert!(root_page.contains("id=\"version\""));
    assert!(root_page.contains("href=\"services/index.html\""));

    let services_page = read(&output.join("enginekit").join("services").join("index.html"));
    assert!(services_page.contains("Module enginekit::services"));
    assert!(services_page.contains("id=\"Service\""));
}

#[test]
fn rendering_is_deterministic() {
    let index = engine_index();
    let out_a = tempdir().unwrap();
    let out_b = tempdir().unwrap();

    HtmlRenderer::new().render(&index, out_a.path()).unwrap();
    HtmlRenderer::new().render(&index, out_b.path()).unwrap();

    for page in [
        Path::new("index.html").to_path_buf(),
        Path::new("enginekit").join("index.html"),
        Path::new("enginekit").join("services").join("index.html"),
        Path::new("static").join("css").join("highlight.css"),
    ] {
        assert_eq!(
            read(&out_a.path().join(&page)),
            read(&out_b.path().join(&page)),
            "page {} differs between runs",
            page.display()
        );
    }
}

#[test]
fn unwritable_output_is_a_render_error() {
    let out = tempdir().unwrap();
    // A plain file where the output directory should go.
    let output = out.path().join("html");
    fs::write(&output, "not a directory").unwrap();

    let err = HtmlRenderer::new()
        .render(&engine_index(), &output)
        .unwrap_err();
    assert!(matches!(err, DocketError::Render { .. }), "got {err:?}");
}

#[test]
fn empty_index_still_renders_entry_page() {
    let out = tempdir().unwrap();
    let output = out.path().join("html");

    HtmlRenderer::new().render(&DocIndex::default(), &output).unwrap();

    assert!(output.join("index.html").exists());
}
