use crate::config::Config;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use url::{ParseError, Url};

#[derive(Error, Debug)]
pub enum OutputsError {
    #[error("UrlError, can't parse given URL: {0}")]
    UrlError(#[from] ParseError),
    #[error("not a uxpilot.ai design URL: {0}")]
    NotUxPilot(String),
    #[error("Time format error: {0}")]
    TimeFormatError(#[from] time::error::Format),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutputsError>;

pub const FILE_PREFIX: &str = "uxpilot";

/// ISO-like timestamp used in artifact names; sorts lexicographically
/// in chronological order.
pub static TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");

static FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^uxpilot-(.+)-(\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2})\.(html|json)$").unwrap()
});

/// Validates a design URL: must parse and live on uxpilot.ai (or a subdomain).
pub fn parse_design_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    match url.host_str() {
        Some(host) if host == "uxpilot.ai" || host.ends_with(".uxpilot.ai") => Ok(url),
        _ => Err(OutputsError::NotUxPilot(raw.to_string())),
    }
}

/// Last non-empty path segment of the design URL, `design` when there is none.
pub fn design_slug(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|segment| !segment.is_empty()).next_back())
        .unwrap_or("design")
        .to_string()
}

/// Current wall-clock time; falls back to UTC when the local offset
/// cannot be determined (multi-threaded processes on Unix).
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn html_dir(config: &Config) -> PathBuf {
    PathBuf::from(&config.output.html)
}

pub fn json_dir(config: &Config) -> PathBuf {
    PathBuf::from(&config.output.json)
}

pub fn create_output_dirs(config: &Config) -> Result<()> {
    std::fs::create_dir_all(html_dir(config))?;
    std::fs::create_dir_all(json_dir(config))?;
    Ok(())
}

pub struct OutputPaths {
    pub html: PathBuf,
    pub json: PathBuf,
}

pub fn format_timestamp(at: OffsetDateTime) -> Result<String> {
    Ok(at.format(TIMESTAMP_FORMAT)?)
}

/// Paths of the `uxpilot-{slug}-{timestamp}.{html,json}` artifact pair.
pub fn output_file_paths(config: &Config, slug: &str, at: OffsetDateTime) -> Result<OutputPaths> {
    let timestamp = format_timestamp(at)?;
    Ok(OutputPaths {
        html: html_dir(config).join(format!("{FILE_PREFIX}-{slug}-{timestamp}.html")),
        json: json_dir(config).join(format!("{FILE_PREFIX}-{slug}-{timestamp}.json")),
    })
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedFileName {
    pub slug: String,
    pub timestamp: String,
}

/// Inverse of [`output_file_paths`]: recovers slug and timestamp from an
/// artifact file name. `None` for names the tool did not generate.
pub fn parse_file_name(name: &str) -> Option<ParsedFileName> {
    let caps = FILE_NAME_RE.captures(name)?;
    Some(ParsedFileName {
        slug: caps[1].to_string(),
        timestamp: caps[2].to_string(),
    })
}

pub fn parse_timestamp(timestamp: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(timestamp, TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn accepts_design_urls() {
        assert!(parse_design_url("https://uxpilot.ai/s/abc123").is_ok());
        assert!(parse_design_url("https://www.uxpilot.ai/s/abc123").is_ok());
    }

    #[test]
    fn rejects_non_design_urls() {
        assert!(matches!(
            parse_design_url("not a url"),
            Err(OutputsError::UrlError(_))
        ));
        assert!(matches!(
            parse_design_url("https://example.com/s/abc"),
            Err(OutputsError::NotUxPilot(_))
        ));
        // host merely containing the name elsewhere
        assert!(parse_design_url("https://uxpilot.ai.evil.com/s/abc").is_err());
        assert!(parse_design_url("https://example.com/?ref=uxpilot.ai").is_err());
    }

    #[test]
    fn slug_is_last_non_empty_path_segment() {
        let url = Url::parse("https://uxpilot.ai/s/my-design").unwrap();
        assert_eq!(design_slug(&url), "my-design");

        let url = Url::parse("https://uxpilot.ai/s/my-design/").unwrap();
        assert_eq!(design_slug(&url), "my-design");

        let url = Url::parse("https://uxpilot.ai/").unwrap();
        assert_eq!(design_slug(&url), "design");
    }

    #[test]
    fn file_names_round_trip() {
        let config = Config::default();
        let at = datetime!(2026-08-30 14:05:09 UTC);
        let paths = output_file_paths(&config, "my-design", at).unwrap();

        let name = paths.html.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, "uxpilot-my-design-2026-08-30_14-05-09.html");

        let parsed = parse_file_name(name).unwrap();
        assert_eq!(parsed.slug, "my-design");
        assert_eq!(parsed.timestamp, "2026-08-30_14-05-09");

        let json_name = paths.json.file_name().unwrap().to_str().unwrap();
        assert_eq!(json_name, "uxpilot-my-design-2026-08-30_14-05-09.json");
    }

    #[test]
    fn hyphenated_slugs_survive_parsing() {
        let parsed = parse_file_name("uxpilot-a-b-c-2026-08-30_14-05-09.json").unwrap();
        assert_eq!(parsed.slug, "a-b-c");
    }

    #[test]
    fn foreign_file_names_do_not_parse() {
        assert!(parse_file_name("notes.html").is_none());
        assert!(parse_file_name("uxpilot-x-2026.html").is_none());
        assert!(parse_file_name("uxpilot-x-2026-08-30_14-05-09.txt").is_none());
    }

    #[test]
    fn timestamps_parse_back() {
        assert!(parse_timestamp("2026-08-30_14-05-09").is_some());
        assert!(parse_timestamp("unknown").is_none());
    }
}
