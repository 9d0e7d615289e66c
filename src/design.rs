use crate::config::Config;
use crate::outputs::{self, OutputPaths, OutputsError};
use futures::future;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use url::Url;

/// File name the Figma plugin repository watches for.
pub const PLUGIN_JSON_FILE: &str = "preview-html.json";

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("no iframe with a srcdoc attribute found in the preview page")]
    MissingSrcdoc,
    #[error("I/O Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("OutputsError: {0}")]
    OutputsError(#[from] OutputsError),
}

pub type Result<T> = std::result::Result<T, DesignError>;

/// A design extracted from a rendered UXPilot preview page.
pub struct DesignPage {
    pub url: String,
    pub slug: String,
    /// Unescaped document embedded in the preview iframe.
    pub html: String,
    pub fetched_at: OffsetDateTime,
}

impl DesignPage {
    /// Pulls the `iframe[srcdoc]` document out of the rendered preview page
    /// and unescapes its HTML entities. An absent or empty srcdoc is an error.
    pub fn from_preview(url: &Url, page_html: &str) -> Result<Self> {
        let document = Html::parse_document(page_html);
        let selector = Selector::parse("iframe[srcdoc]").unwrap();

        let srcdoc = document
            .select(&selector)
            .find_map(|element| element.value().attr("srcdoc"))
            .filter(|srcdoc| !srcdoc.trim().is_empty())
            .ok_or(DesignError::MissingSrcdoc)?;

        Ok(Self {
            url: url.to_string(),
            slug: outputs::design_slug(url),
            html: unescape_html(srcdoc),
            fetched_at: outputs::now(),
        })
    }

    /// Writes the HTML and styles-JSON artifacts as two parallel writes.
    /// Returns the paths and the byte counts written.
    pub async fn write_artifacts(
        &self,
        config: &Config,
        styles_json: &str,
    ) -> Result<(OutputPaths, u64, u64)> {
        outputs::create_output_dirs(config)?;
        let paths = outputs::output_file_paths(config, &self.slug, self.fetched_at)?;

        let html_document = format!("<!DOCTYPE html>{}", self.html);
        let html_write = write_file(&paths.html, html_document.as_bytes());
        let json_write = write_file(&paths.json, styles_json.as_bytes());

        let (html_res, json_res) = future::join(html_write, json_write).await;
        let html_bytes = html_res?;
        let json_bytes = json_res?;

        Ok((paths, html_bytes, json_bytes))
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<u64> {
    tokio::fs::write(path, bytes).await?;
    Ok(bytes.len() as u64)
}

pub fn plugin_json_path(config: &Config) -> PathBuf {
    Path::new(&config.paths.figma_plugin).join(PLUGIN_JSON_FILE)
}

/// Mirrors the styles JSON into the Figma plugin repository.
pub async fn write_json_to_plugin_repo(config: &Config, json: &str) -> Result<(PathBuf, u64)> {
    let path = plugin_json_path(config);
    tokio::fs::write(&path, json).await?;
    Ok((path, json.len() as u64))
}

/// Single-pass HTML entity unescape: the named entities srcdoc escaping
/// produces plus decimal/hex numeric references. Anything unrecognized is
/// left as-is.
pub fn unescape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match parse_entity(rest) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

// `s` starts with '&'; returns the decoded char and the byte length consumed.
fn parse_entity(s: &str) -> Option<(char, usize)> {
    // entities are short; cap the search so a stray '&' stays cheap
    let end = s.as_bytes().iter().take(12).position(|&b| b == b';')?;
    let body = &s[1..end];

    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let digits = body.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };

    Some((ch, end + 1))
}
