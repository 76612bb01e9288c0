//! Shared output formatting for CLI commands.

use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => anyhow::bail!("Unsupported output format: '{}'. Use 'json' or 'yaml'.", s),
        }
    }
}

/// Print data in the specified format
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(data, format)?);
    Ok(())
}

pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).context("Failed to serialize to JSON"),
        OutputFormat::Yaml => serde_yaml::to_string(data).context("Failed to serialize to YAML"),
    }
}

/// Print rows under a header, each column padded to its width.
pub fn print_table(columns: &[(&str, usize)], rows: &[Vec<String>]) {
    let line = |cells: Vec<String>| {
        let mut out = String::new();
        for (cell, (_, width)) in cells.iter().zip(columns) {
            out.push_str(&format!("{:<width$} ", truncate(cell, *width), width = width));
        }
        out.trim_end().to_string()
    };

    println!("{}", line(columns.iter().map(|(name, _)| name.to_string()).collect()));
    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    println!("{}", "-".repeat(total_width.saturating_sub(1)));
    for row in rows {
        println!("{}", line(row.clone()));
    }
}

/// Truncate string to maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render() {
        let data = TestData { name: "test".to_string(), value: 42 };
        assert_eq!(render(&data, OutputFormat::Yaml).unwrap(), "name: test\nvalue: 42\n");
        assert!(render(&data, OutputFormat::Json).unwrap().contains("\"value\": 42"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 3), "...");
    }
}
