//! Text clean-up applied to DAS record fields before classification
//!
//! Type categories and type texts arrive quoted in some sources, and note
//! text ends up inside HTML attributes and inline markup, so double quotes
//! must not survive into it.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove every single quote, double quote and `&quot;` entity
///
/// # Examples
///
/// ```
/// use protanno::parser::sanitize::strip_quotes;
///
/// assert_eq!(strip_quotes("\"Secondary structure\""), "Secondary structure");
/// assert_eq!(strip_quotes("&quot;Domain&quot;"), "Domain");
/// ```
pub fn strip_quotes(text: &str) -> String {
    text.replace('\'', "").replace('"', "").replace("&quot;", "")
}

/// Concatenate note fragments into one note text
///
/// Fragments are joined with single spaces and double quotes become single
/// quotes. Returns `None` when there is no fragment at all.
///
/// # Examples
///
/// ```
/// use protanno::parser::sanitize::join_notes;
///
/// let notes = vec!["Binds \"ATP\"".to_string(), "weakly".to_string()];
/// assert_eq!(join_notes(&notes).as_deref(), Some("Binds 'ATP' weakly"));
/// assert_eq!(join_notes(&[]), None);
/// ```
pub fn join_notes(notes: &[String]) -> Option<String> {
    if notes.is_empty() {
        return None;
    }

    Some(notes.join(" ").replace('"', "'"))
}

/// Strip HTML tags from text
pub fn strip_html_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quotes_removes_all_occurrences() {
        assert_eq!(strip_quotes("'Zinc' \"finger\""), "Zinc finger");
        assert_eq!(strip_quotes("no quotes"), "no quotes");
    }

    #[test]
    fn test_join_notes_single_fragment() {
        let notes = vec!["only".to_string()];
        assert_eq!(join_notes(&notes).as_deref(), Some("only"));
    }

    #[test]
    fn test_join_notes_normalizes_double_quotes() {
        let notes = vec!["say \"hi\"".to_string(), "\"x\"".to_string()];
        assert_eq!(join_notes(&notes).as_deref(), Some("say 'hi' 'x'"));
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(
            strip_html_tags("a<span class='highlight'>b</span>c"),
            "abc"
        );
    }
}
