use crate::config::Config;
use crate::outputs::{self, OutputsError};
use indicatif::HumanBytes;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub const UNKNOWN: &str = "unknown";

static DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year] [hour]:[minute]");

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("OutputsError: {0}")]
    OutputsError(#[from] OutputsError),
}

pub type Result<T> = std::result::Result<T, ListingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Html,
    Json,
}

/// One artifact found in the output directories.
#[derive(Debug)]
pub struct DesignFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub kind: FileKind,
    /// Slug recovered from the file name, [`UNKNOWN`] for foreign files.
    pub slug: String,
    pub timestamp: String,
}

/// Scans both output directories, creating them first when missing.
pub fn collect_design_files(config: &Config) -> Result<Vec<DesignFile>> {
    let html_dir = outputs::html_dir(config);
    let json_dir = outputs::json_dir(config);

    for dir in [&html_dir, &json_dir] {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            tracing::info!(dir = %dir.display(), "created output directory");
        }
    }

    let mut files = Vec::new();
    scan_dir(&html_dir, "html", FileKind::Html, &mut files)?;
    scan_dir(&json_dir, "json", FileKind::Json, &mut files)?;
    Ok(files)
}

fn scan_dir(dir: &Path, ext: &str, kind: FileKind, files: &mut Vec<DesignFile>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let (slug, timestamp) = match outputs::parse_file_name(&name) {
            Some(parsed) => (parsed.slug, parsed.timestamp),
            None => (UNKNOWN.to_string(), UNKNOWN.to_string()),
        };

        files.push(DesignFile {
            name,
            path,
            size: metadata.len(),
            modified: metadata.modified()?,
            kind,
            slug,
            timestamp,
        });
    }
    Ok(())
}

/// Groups files by design slug, most recently touched design first.
pub fn group_by_design(files: Vec<DesignFile>) -> Vec<(String, Vec<DesignFile>)> {
    let mut groups: BTreeMap<String, Vec<DesignFile>> = BTreeMap::new();
    for file in files {
        groups.entry(file.slug.clone()).or_default().push(file);
    }

    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by_key(|(_, files)| {
        Reverse(
            files
                .iter()
                .map(|file| file.modified)
                .max()
                .unwrap_or(SystemTime::UNIX_EPOCH),
        )
    });
    groups
}

/// Prints the per-design report: extractions newest first, each pairing its
/// HTML and JSON halves.
pub fn print_report(groups: &[(String, Vec<DesignFile>)]) {
    if groups.is_empty() {
        println!("No extracted designs found.");
        return;
    }

    println!("Found {} unique design(s)", groups.len());

    for (slug, files) in groups {
        println!("\nDesign: {slug}");

        let mut by_timestamp: BTreeMap<&str, (Option<&DesignFile>, Option<&DesignFile>)> =
            BTreeMap::new();
        for file in files {
            let pair = by_timestamp.entry(file.timestamp.as_str()).or_default();
            match file.kind {
                FileKind::Html => pair.0 = Some(file),
                FileKind::Json => pair.1 = Some(file),
            }
        }

        println!("  Total extractions: {}", by_timestamp.len());

        // timestamps sort lexicographically in chronological order
        for (timestamp, (html, json)) in by_timestamp.iter().rev() {
            println!("  - {}", display_time(timestamp));
            if let Some(file) = html {
                println!("      HTML: {} ({})", file.path.display(), HumanBytes(file.size));
            }
            if let Some(file) = json {
                println!("      JSON: {} ({})", file.path.display(), HumanBytes(file.size));
            }
            if html.is_none() || json.is_none() {
                let missing = if html.is_none() { "HTML" } else { "JSON" };
                println!("      missing {missing} file");
            }
        }
    }

    println!("\nRun clear_outputs to delete all outputs");
}

fn display_time(timestamp: &str) -> String {
    match outputs::parse_timestamp(timestamp) {
        Some(at) => at
            .format(DISPLAY_FORMAT)
            .unwrap_or_else(|_| timestamp.to_string()),
        None => "Unknown".to_string(),
    }
}
