use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use url::Url;

/// Safely truncate a string, ensuring it is not truncated in the middle of multi-byte characters
///
/// This function will:
/// 1. Correctly handle Unicode characters (including Chinese, emoji, etc.)
/// 2. Add ellipsis when maximum length is reached
/// 3. Ensure the output string's display width does not exceed the specified length
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);

        if current_width + char_width + 3 > max_width {
            break;
        }

        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// Greedy word wrap by display width, keeping at most `max_lines` lines.
/// Overflowing text is cut with an ellipsis on the last kept line. Words
/// wider than a whole line are split by character.
pub fn wrap_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(4);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflow = false;

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };

        if candidate <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // long word: hard split
        for c in word.chars() {
            if current.width() + c.width().unwrap_or(1) > width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
        }

        if lines.len() >= max_lines {
            overflow = true;
            break;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        overflow = true;
    }

    if overflow {
        if let Some(last) = lines.last_mut() {
            *last = truncate_str(&format!("{last} ..."), width);
            if !last.ends_with("...") {
                last.push_str("...");
            }
        }
    }

    lines
}

/// Drops characters XML 1.0 cannot carry: C0 controls other than tab,
/// newline and carriage return, and the noncharacters U+FFFE and U+FFFF.
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            matches!(
                c,
                '\t' | '\n' | '\r' | ' '..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
            )
        })
        .collect()
}

/// Host part of `url` without a leading `www.`, falling back to the input.
/// Scheme-less input such as `example.com/page` is accepted.
pub fn display_host(url: &str) -> String {
    let parsed = Url::parse(url).or_else(|_| Url::parse(&format!("https://{url}")));

    parsed
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string())
}
