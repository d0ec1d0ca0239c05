/// Display width used for wrapped text replies.
pub const WRAP_COLUMNS: usize = 64;

/// Re-wraps each existing line word by word so no line exceeds `max_len`
/// display characters. Words longer than the budget are kept whole.
pub fn wrap_by_words(input: &str, max_len: usize) -> String {
    if max_len == 0 {
        return input.to_string();
    }

    input
        .split('\n')
        .map(|line| wrap_line(line, max_len))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, max_len: usize) -> String {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return line.to_string();
    }

    let mut out = String::new();
    let mut line_len = 0_usize;
    for word in words {
        let word_len = word.chars().count();
        if line_len == 0 {
            out.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= max_len {
            out.push(' ');
            out.push_str(word);
            line_len += 1 + word_len;
        } else {
            out.push('\n');
            out.push_str(word);
            line_len = word_len;
        }
    }
    out
}

/// Cuts `title` to `keep` characters when it exceeds `limit`. Operates on
/// chars so a multi-byte codepoint is never split.
pub fn truncate_title(title: &str, limit: usize, keep: usize) -> String {
    if title.chars().count() > limit {
        title.chars().take(keep).collect()
    } else {
        title.to_string()
    }
}

/// Minimal percent-encoding for a query substituted into a URL template.
pub fn url_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push_str("%20"),
            other => {
                out.push('%');
                out.push_str(&format!("{other:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{truncate_title, url_encode, wrap_by_words};

    #[test]
    fn wraps_long_lines_at_word_boundaries() {
        let wrapped = wrap_by_words("one two three four five", 9);
        assert_eq!(wrapped, "one two\nthree\nfour five");
    }

    #[test]
    fn preserves_existing_line_breaks() {
        let wrapped = wrap_by_words("first line\nsecond line", 64);
        assert_eq!(wrapped, "first line\nsecond line");
    }

    #[test]
    fn zero_budget_returns_input_unchanged() {
        assert_eq!(wrap_by_words("anything at all", 0), "anything at all");
    }

    #[test]
    fn truncation_is_codepoint_safe() {
        let title: String = "é".repeat(70);
        let cut = truncate_title(&title, 64, 60);
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn short_titles_pass_through() {
        assert_eq!(truncate_title("Notepad", 64, 60), "Notepad");
    }

    #[test]
    fn encodes_reserved_url_characters() {
        assert_eq!(url_encode("rust lang & more"), "rust%20lang%20%26%20more");
        assert_eq!(url_encode("plain-text_1.0~ok"), "plain-text_1.0~ok");
    }
}
