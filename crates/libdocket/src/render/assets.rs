//! Static assets written alongside the rendered pages.

use std::fs;
use std::path::Path;

use crate::{
    error::{DocketError, Result},
    highlight,
};

/// Layout stylesheet embedded at build time.
static DOCKET_CSS: &str = include_str!("static/docket.css");

/// Write the stylesheet directory under `output_dir`.
pub(crate) fn write_static_files(output_dir: &Path) -> Result<()> {
    let css_dir = output_dir.join("static").join("css");
    fs::create_dir_all(&css_dir).map_err(|e| asset_error(&css_dir, &e))?;

    let docket_css = css_dir.join("docket.css");
    fs::write(&docket_css, DOCKET_CSS).map_err(|e| asset_error(&docket_css, &e))?;

    let highlight_css = css_dir.join("highlight.css");
    fs::write(&highlight_css, highlight::theme_css()?)
        .map_err(|e| asset_error(&highlight_css, &e))?;

    Ok(())
}

fn asset_error(path: &Path, err: &std::io::Error) -> DocketError {
    DocketError::Render {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_stylesheets() {
        let out = tempdir().unwrap();
        write_static_files(out.path()).unwrap();

        let css_dir = out.path().join("static").join("css");
        assert!(css_dir.join("docket.css").exists());
        assert!(css_dir.join("highlight.css").exists());

        let layout = fs::read_to_string(css_dir.join("docket.css")).unwrap();
        assert!(layout.contains(".sidebar"));
    }
}
