/// Placeholder that marks a blank inside a question template.
pub const BLANK_MARKER: &str = "_____________";

/// Split a template into the fixed text around its blanks.
///
/// A template with N markers yields N+1 fragments: the text before the first
/// blank, between consecutive blanks, and after the last one. A template with
/// no marker yields a single fragment.
pub fn parse_sentence(template: &str) -> Vec<&str> {
    template.split(BLANK_MARKER).collect()
}

pub fn blank_count(template: &str) -> usize {
    template.matches(BLANK_MARKER).count()
}

/// Interleave fragments with the given slot texts. Missing slots render as
/// `empty`.
pub fn fill_sentence(fragments: &[&str], slots: &[Option<&str>], empty: &str) -> String {
    let mut out = String::new();
    for (i, fragment) in fragments.iter().enumerate() {
        out.push_str(fragment);
        if i + 1 < fragments.len() {
            out.push_str(slots.get(i).copied().flatten().unwrap_or(empty));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_blanks_give_three_fragments() {
        let template = format!("A {BLANK_MARKER} B {BLANK_MARKER} C");
        let parts = parse_sentence(&template);
        assert_eq!(parts, vec!["A ", " B ", " C"]);
        assert_eq!(blank_count(&template), 2);
    }

    #[test]
    fn test_no_marker_is_single_fragment() {
        let parts = parse_sentence("plain sentence");
        assert_eq!(parts, vec!["plain sentence"]);
        assert_eq!(blank_count("plain sentence"), 0);
    }

    #[test]
    fn test_leading_and_trailing_markers_keep_empty_fragments() {
        let template = format!("{BLANK_MARKER} middle {BLANK_MARKER}");
        let parts = parse_sentence(&template);
        assert_eq!(parts, vec!["", " middle ", ""]);
    }

    #[test]
    fn test_fragments_rejoin_to_template() {
        let templates = [
            String::new(),
            BLANK_MARKER.to_string(),
            format!("The {BLANK_MARKER} fox {BLANK_MARKER}{BLANK_MARKER} over."),
            "no blanks at all".to_string(),
        ];
        for template in &templates {
            let parts = parse_sentence(template);
            assert_eq!(parts.len(), blank_count(template) + 1);
            assert_eq!(parts.join(BLANK_MARKER), *template);
        }
    }

    #[test]
    fn test_fill_sentence_uses_placeholder_for_unfilled() {
        let template = format!("A {BLANK_MARKER} B {BLANK_MARKER} C");
        let parts = parse_sentence(&template);
        let filled = fill_sentence(&parts, &[Some("x"), None], "___");
        assert_eq!(filled, "A x B ___ C");
    }
}
