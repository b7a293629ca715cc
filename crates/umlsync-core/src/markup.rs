//! HTML label markup used inside draw.io cell labels.
//!
//! Cell labels are rendered by draw.io as HTML (`html=1` in every style this
//! crate emits). Multi-line text is therefore joined with [`LINE_BREAK`] and
//! literal angle brackets, as found in generic type syntax like
//! `List<Enemy>`, must be written as entities.

/// Separator placed between lines of a label.
pub const LINE_BREAK: &str = "<br/>";

/// Replaces `<` and `>` with their HTML entities.
///
/// # Examples
///
/// ```
/// # use umlsync_core::markup::escape_angle_brackets;
/// assert_eq!(escape_angle_brackets("List<Enemy>"), "List&lt;Enemy&gt;");
/// ```
pub fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Reverses [`escape_angle_brackets`].
pub fn unescape_angle_brackets(text: &str) -> String {
    text.replace("&lt;", "<").replace("&gt;", ">")
}

/// Appends `line` to an optional accumulated label, inserting [`LINE_BREAK`]
/// between entries.
pub fn append_line(target: &mut Option<String>, line: &str) {
    match target {
        Some(text) => {
            text.push_str(LINE_BREAK);
            text.push_str(line);
        }
        None => *target = Some(line.to_string()),
    }
}

/// Same as [`append_line`] for labels where an empty string means "nothing yet".
pub fn append_entry(target: &mut String, entry: &str) {
    if !target.is_empty() {
        target.push_str(LINE_BREAK);
    }
    target.push_str(entry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip_keeps_plain_text() {
        let text = "Dictionary<string, List<int>>";
        let escaped = escape_angle_brackets(text);

        assert!(!escaped.contains('<'));
        assert_eq!(unescape_angle_brackets(&escaped), text);
    }

    #[test]
    fn test_append_line() {
        let mut label = None;
        append_line(&mut label, "- hp: int");
        append_line(&mut label, "- speed: float");

        assert_eq!(label.as_deref(), Some("- hp: int<br/>- speed: float"));
    }

    #[test]
    fn test_append_entry_skips_leading_separator() {
        let mut tooltip = String::new();
        append_entry(&mut tooltip, "hp: health");
        append_entry(&mut tooltip, "speed: units per second");

        assert_eq!(tooltip, "hp: health<br/>speed: units per second");
    }
}
