//! Toolchain preflight checks.

use std::process::{Command, Stdio};

use crate::error::{DocketError, Result};

/// Ensure the nightly toolchain used for documentation JSON is installed.
pub fn ensure_nightly() -> Result<()> {
    let output = Command::new("rustup")
        .args(["run", "nightly", "rustc", "--version"])
        .stderr(Stdio::null())
        .output()
        .map_err(|e| DocketError::Generate(format!("failed to run rustup: {e}")))?;

    if !output.status.success() {
        return Err(DocketError::Generate(
            "docket requires the nightly toolchain to be installed. \
            Run: rustup toolchain install nightly"
                .to_string(),
        ));
    }

    Ok(())
}
