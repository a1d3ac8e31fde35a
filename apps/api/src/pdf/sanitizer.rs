//! LaTeX text sanitizer.
//!
//! Every string that reaches a template comes from the user or the LLM and
//! must be treated as hostile to the typesetter. Escaping happens in a single
//! pass over the input: each character is matched against the reserved set
//! and its replacement is appended to the output, which is never re-scanned.
//! Sequential `str::replace` calls would re-escape the backslashes introduced
//! by earlier rules (`\` -> `\textbackslash{}` -> `\textbackslash\{\}` ...).

use serde_json::Value;

/// Escapes all LaTeX-reserved characters in `text` so it renders literally.
///
/// Pure and infallible: any input string produces a valid output string.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            '<' => out.push_str(r"\textless{}"),
            '>' => out.push_str(r"\textgreater{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Recursively sanitizes every string leaf of a JSON value.
///
/// Objects and arrays are walked; numbers, booleans and null pass through
/// unchanged. This is the policy for non-string leaves: leave them as-is.
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), sanitize_value(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_escapes_reserved_set() {
        assert_eq!(sanitize("A&B"), r"A\&B");
        assert_eq!(sanitize("100%"), r"100\%");
        assert_eq!(sanitize("$5"), r"\$5");
        assert_eq!(sanitize("#1"), r"\#1");
        assert_eq!(sanitize("snake_case"), r"snake\_case");
        assert_eq!(sanitize("{x}"), r"\{x\}");
        assert_eq!(sanitize("~user"), r"\textasciitilde{}user");
        assert_eq!(sanitize("x^2"), r"x\textasciicircum{}2");
        assert_eq!(sanitize("<tag>"), r"\textless{}tag\textgreater{}");
    }

    #[test]
    fn test_sanitize_backslash_not_reescaped() {
        // The braces inside \textbackslash{} come from the replacement itself
        // and must not be hit by the { / } rules.
        assert_eq!(sanitize(r"C:\temp"), r"C:\textbackslash{}temp");
    }

    #[test]
    fn test_sanitize_plain_text_unchanged() {
        let text = "Senior Rust Engineer, 5 years of experience.";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_sanitize_empty_string() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_sanitize_mixed_adjacent_specials() {
        assert_eq!(sanitize("a&%b"), r"a\&\%b");
    }

    #[test]
    fn test_sanitize_value_walks_nested_structures() {
        let value = json!({
            "name": "A&B",
            "skills": ["C++ & Rust", "100% uptime"],
            "nested": { "note": "x_y" }
        });
        let sanitized = sanitize_value(&value);
        assert_eq!(sanitized["name"], json!(r"A\&B"));
        assert_eq!(sanitized["skills"][0], json!(r"C++ \& Rust"));
        assert_eq!(sanitized["skills"][1], json!(r"100\% uptime"));
        assert_eq!(sanitized["nested"]["note"], json!(r"x\_y"));
    }

    #[test]
    fn test_sanitize_value_leaves_non_strings_untouched() {
        let value = json!({ "gpa": 3.9, "current": true, "end_date": null, "count": 4 });
        let sanitized = sanitize_value(&value);
        assert_eq!(sanitized, value);
    }
}
