//! Escaping of user-supplied literals before they are interpolated into the engine grammar.

/// Characters with a meaning in the engine query syntax.
pub const RESERVED_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
];

/// Prefixes every reserved character with a backslash, in a single left-to-right pass.
///
/// Input must be raw user text: an already escaped string gets its
/// backslashes escaped again.
pub fn escape_query_literal(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if RESERVED_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes only what would terminate a quoted phrase (`"` and `\`).
pub fn escape_phrase(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_query_literal("Acme Ltda"), "Acme Ltda");
        assert_eq!(escape_query_literal(""), "");
        assert_eq!(escape_query_literal("São João"), "São João");
    }

    #[test]
    fn every_reserved_char_gets_one_backslash() {
        for c in RESERVED_CHARS {
            let raw = format!("a{c}b");
            assert_eq!(escape_query_literal(&raw), format!("a\\{c}b"));
        }
    }

    #[test]
    fn mixed_input() {
        assert_eq!(escape_query_literal("10.5-2024/01"), "10.5\\-2024/01");
        assert_eq!(escape_query_literal("(a+b)*c?"), "\\(a\\+b\\)\\*c\\?");
        assert_eq!(escape_query_literal("a && b || !c"), "a \\&\\& b \\|\\| \\!c");
        assert_eq!(escape_query_literal("x:\"y\""), "x\\:\\\"y\\\"");
    }

    #[test]
    fn plain_text_escape_is_idempotent() {
        let once = escape_query_literal("processo fiscal");
        assert_eq!(escape_query_literal(&once), once);
    }

    #[test]
    fn escaping_twice_doubles_backslashes() {
        let once = escape_query_literal("a-b");
        assert_eq!(once, "a\\-b");
        assert_eq!(escape_query_literal(&once), "a\\\\\\-b");
    }

    #[test]
    fn phrase_escape_keeps_operators() {
        assert_eq!(escape_phrase("SP - São Paulo"), "SP - São Paulo");
        assert_eq!(escape_phrase("a\"b\\c"), "a\\\"b\\\\c");
    }
}
