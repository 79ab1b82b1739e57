//! Render command responses as JSON or plain aligned tables.

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => {
            let value = serde_json::to_value(value)?;
            Ok(render_value(&value))
        }
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Array(items) => render_rows(items),
        Value::Object(map) => {
            let rows: Vec<Vec<String>> = map
                .iter()
                .map(|(key, value)| vec![key.clone(), cell(value)])
                .collect();
            render_table(&["key".into(), "value".into()], &rows)
        }
        scalar => cell(scalar),
    }
}

fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return "(empty)".to_string();
    }

    // Column set = union of keys across rows, first-seen order.
    let mut headers: Vec<String> = Vec::new();
    for item in items {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    if headers.is_empty() {
        return items.iter().map(cell).collect::<Vec<_>>().join("\n");
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            headers
                .iter()
                .map(|key| item.get(key).map_or_else(String::new, cell))
                .collect()
        })
        .collect();
    render_table(&headers, &rows)
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers, &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row, &widths));
    }
    lines.join("\n")
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arrays_render_as_column_tables() {
        let value = serde_json::json!([
            {"id": "u1", "name": "Acme"},
            {"id": "o2", "name": "Globex"},
        ]);
        let rendered = render_value(&value);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "id  name");
        assert!(lines[2].starts_with("u1"));
    }

    #[test]
    fn objects_render_as_key_value_tables() {
        let value = serde_json::json!({"admin": true, "selected": "u1"});
        let rendered = render_value(&value);
        assert!(rendered.contains("admin"));
        assert!(rendered.contains("true"));
    }

    #[test]
    fn empty_arrays_render_placeholder() {
        assert_eq!(render_value(&serde_json::json!([])), "(empty)");
    }
}
