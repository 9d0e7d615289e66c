use crate::config::{Config, DeviceType};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Entry point of the computeHtmlStyles repository.
pub const MODULE_FILE: &str = "htmlToJsonUtils-dev.js";

// Bridges into the external JS module: imports it from argv, feeds the HTML
// from stdin to computeStyles and prints the result as one JSON object.
const NODE_RUNNER: &str = r#"
const { pathToFileURL } = require("url");
const [modulePath, deviceType] = process.argv.slice(1);
let html = "";
process.stdin.setEncoding("utf8");
process.stdin.on("data", (chunk) => (html += chunk));
process.stdin.on("end", async () => {
  const { computeStyles } = await import(pathToFileURL(modulePath).href);
  const { computedStyles } = await computeStyles(html, deviceType);
  process.stdout.write(JSON.stringify({ computedStyles }));
});
"#;

#[derive(Error, Debug)]
pub enum StylesError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("compute module not found at {0}")]
    ModuleNotFound(PathBuf),
    #[error("computeStyles exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("computeStyles produced invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("computeStyles output has no computedStyles field")]
    MissingComputedStyles,
}

pub type Result<T> = std::result::Result<T, StylesError>;

/// Opaque `HTML -> styles JSON` transform, backed by the external
/// computeHtmlStyles module driven through a node subprocess.
#[derive(Debug)]
pub struct StyleComputer {
    module_path: PathBuf,
    device_type: DeviceType,
}

impl StyleComputer {
    pub fn from_config(config: &Config) -> Result<Self> {
        let module_path = Path::new(&config.paths.compute_html_styles).join(MODULE_FILE);
        if !module_path.is_file() {
            return Err(StylesError::ModuleNotFound(module_path));
        }
        // dynamic import inside the runner needs an absolute path
        let module_path = module_path.canonicalize()?;

        Ok(Self {
            module_path,
            device_type: config.options.device_type,
        })
    }

    /// Runs computeStyles over `html`, returning the pretty-printed
    /// `computedStyles` JSON.
    pub async fn compute(&self, html: &str) -> Result<String> {
        let mut child = Command::new("node")
            .arg("-e")
            .arg(NODE_RUNNER)
            .arg(&self.module_path)
            .arg(self.device_type.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("child stdin not captured"))?;
        stdin.write_all(html.as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(StylesError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        extract_computed_styles(&value)
    }
}

/// Pulls the `computedStyles` field out of the transform output and
/// pretty-prints it.
pub fn extract_computed_styles(value: &serde_json::Value) -> Result<String> {
    let computed = value
        .get("computedStyles")
        .filter(|styles| !styles.is_null())
        .ok_or(StylesError::MissingComputedStyles)?;
    Ok(serde_json::to_string_pretty(computed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_and_pretty_prints_computed_styles() {
        let value = json!({ "computedStyles": { "width": 1280 } });
        let styles = extract_computed_styles(&value).unwrap();
        assert_eq!(styles, "{\n  \"width\": 1280\n}");
    }

    #[test]
    fn missing_field_is_an_error() {
        let value = json!({ "somethingElse": 1 });
        assert!(matches!(
            extract_computed_styles(&value),
            Err(StylesError::MissingComputedStyles)
        ));
    }

    #[test]
    fn null_field_counts_as_missing() {
        let value = json!({ "computedStyles": null });
        assert!(matches!(
            extract_computed_styles(&value),
            Err(StylesError::MissingComputedStyles)
        ));
    }

    #[test]
    fn missing_module_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.paths.compute_html_styles = dir.path().to_str().unwrap().to_string();

        match StyleComputer::from_config(&config) {
            Err(StylesError::ModuleNotFound(path)) => {
                assert_eq!(path, dir.path().join(MODULE_FILE));
            }
            other => panic!("expected ModuleNotFound, got {other:?}"),
        }
    }
}
