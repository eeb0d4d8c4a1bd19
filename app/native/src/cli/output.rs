//! CLI output formatting utilities.
//!
//! JSON syntax highlighting for `--json` output and truncation of long paths
//! in plain listings.

use colored::Colorize;

/// Prints JSON with syntax highlighting.
///
/// Keys are cyan, strings green, numbers yellow, booleans and null magenta.
pub fn print_highlighted_json(value: &serde_json::Value) {
    let mut out = String::new();
    render(value, 0, &mut out);
    println!("{out}");
}

const INDENT: &str = "  ";

fn render(value: &serde_json::Value, depth: usize, out: &mut String) {
    use serde_json::Value;

    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(b) => out.push_str(&b.to_string().magenta().to_string()),
        Value::Number(n) => out.push_str(&n.to_string().yellow().to_string()),
        Value::String(s) => out.push_str(&quoted(s).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str(&"[]".white().bold().to_string()),
        Value::Object(map) if map.is_empty() => out.push_str(&"{}".white().bold().to_string()),
        Value::Array(items) => {
            out.push_str(&"[".white().bold().to_string());
            for (i, item) in items.iter().enumerate() {
                separator(i, depth + 1, out);
                render(item, depth + 1, out);
            }
            closing("]", depth, out);
        }
        Value::Object(map) => {
            out.push_str(&"{".white().bold().to_string());
            for (i, (key, item)) in map.iter().enumerate() {
                separator(i, depth + 1, out);
                out.push_str(&quoted(key).cyan().to_string());
                out.push_str(": ");
                render(item, depth + 1, out);
            }
            closing("}", depth, out);
        }
    }
}

fn quoted(s: &str) -> String { serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\"")) }

fn separator(index: usize, depth: usize, out: &mut String) {
    if index > 0 {
        out.push(',');
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
}

fn closing(bracket: &str, depth: usize, out: &mut String) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&bracket.white().bold().to_string());
}

/// Truncates a string to a maximum number of characters, adding ellipsis if needed.
///
/// This function correctly handles multi-byte UTF-8 characters by counting
/// characters rather than bytes.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        // Find the byte index of the (max_chars - 1)th character
        let truncate_at = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
        format!("{}…", &s[..truncate_at])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 8), "hello w…");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_min_length() {
        assert_eq!(truncate("hello", 1), "…");
    }

    #[test]
    fn test_truncate_multibyte_utf8() {
        // Em-dash is 3 bytes in UTF-8
        let s = "Queen — Innuendo";
        // Should truncate at character boundary, not byte boundary
        assert_eq!(truncate(s, 8), "Queen —…");
        // Full string should not be truncated
        assert_eq!(truncate(s, 20), s);
    }

    #[test]
    fn test_render_matches_pretty_json_without_colors() {
        colored::control::set_override(false);
        let value = serde_json::json!({"musicFanartScraped": 2, "paths": [r#"/a "b".jpg"#], "empty": []});
        let mut out = String::new();
        render(&value, 0, &mut out);
        assert_eq!(out, serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_truncate_emoji() {
        let s = "/fanart/🎸 guitar.jpg";
        assert_eq!(truncate(s, 10), "/fanart/🎸…");
    }
}
