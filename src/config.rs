//! Configuration module.
//!
//! This module defines the command-line interface (CLI) using `clap`.
//! It takes exactly one snapshot document plus output and logging options.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::layout::LayoutConfig;
use crate::render::Format;

/// Renders linker state snapshots as layout diagrams or text reports.
///
/// The input is a JSON array of snapshots, as dumped by the linker at successive
/// points of a link. Each snapshot becomes one independent diagram or report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Snapshot document to render
    pub input: PathBuf,

    /// Output file
    #[arg(short, long, help = "Path to the output file (default: standard output)")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    pub format: Format,

    /// Diagram width in pixels
    #[arg(long, default_value_t = 600, help = "Width of each snapshot diagram")]
    pub width: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", help = "Set the logging level")]
    pub log_level: String,
}

impl Config {
    pub fn layout(&self) -> Result<LayoutConfig> {
        LayoutConfig::with_width(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input() {
        let config = Config::try_parse_from(["snapviz", "snap.json"]).unwrap();
        assert_eq!(config.input, PathBuf::from("snap.json"));
        assert_eq!(config.format, Format::Html);
        assert!(config.output.is_none());
        assert_eq!(config.layout().unwrap(), LayoutConfig::default());
    }

    #[test]
    fn test_argument_count_is_enforced() {
        assert!(Config::try_parse_from(["snapviz"]).is_err());
        assert!(Config::try_parse_from(["snapviz", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_options() {
        let config = Config::try_parse_from([
            "snapviz", "-f", "text", "-o", "out.txt", "--width", "900", "snap.json",
        ])
        .unwrap();
        assert_eq!(config.format, Format::Text);
        assert_eq!(config.output, Some(PathBuf::from("out.txt")));
        assert_eq!(config.layout().unwrap().root_width, 900);
    }

    #[test]
    fn test_narrow_width_is_rejected() {
        let config = Config::try_parse_from(["snapviz", "--width", "100", "snap.json"]).unwrap();
        assert!(config.layout().is_err());
    }
}
