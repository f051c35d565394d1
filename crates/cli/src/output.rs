//! Output formatting for CLI
//!
//! Tables and structured output go to stdout. Status messages go to stderr
//! so a compiled script can be piped straight into a file.

use anyhow::Result;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Render a list of items in the requested format
pub fn render_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Table => {
            if items.is_empty() {
                return Ok("No items found.".to_string());
            }
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            table.to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(items)?,
        OutputFormat::Yaml => serde_yaml::to_string(items)?,
        OutputFormat::Plain => {
            let mut out = Vec::new();
            for item in items {
                let row = item.row();
                let lines: Vec<String> = T::headers()
                    .iter()
                    .zip(row.iter())
                    .map(|(header, value)| format!("{}: {}", header, value))
                    .collect();
                out.push(lines.join("\n"));
            }
            out.join("\n---\n")
        }
    };
    Ok(rendered)
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) -> Result<()> {
    println!("{}", render_list(items, format)?.trim_end());
    Ok(())
}

/// Print success message
pub fn print_success(message: &str) {
    eprintln!("✅ {}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("⚠️  {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        name: String,
        count: usize,
    }

    impl TableDisplay for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Name", "Count"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.name.clone(), self.count.to_string()]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "login".into(), count: 2 },
            Row { name: "cart".into(), count: 1 },
        ]
    }

    #[test]
    fn test_plain_output() {
        let out = render_list(&rows(), OutputFormat::Plain).unwrap();
        assert_eq!(out, "Name: login\nCount: 2\n---\nName: cart\nCount: 1");
    }

    #[test]
    fn test_structured_output() {
        let json = render_list(&rows(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["name"], "cart");

        let yaml = render_list(&rows(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("name: login"));
    }

    #[test]
    fn test_empty_table() {
        let out = render_list::<Row>(&[], OutputFormat::Table).unwrap();
        assert_eq!(out, "No items found.");
    }
}
