//! Utility functions for Telegram's HTML parse mode
//!
//! Only `&`, `<` and `>` are special in HTML mode, so every piece of user or
//! seed text is passed through [`escape_html`] before it is interpolated into
//! a message with tags.

/// Telegram rejects messages longer than this many characters.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Escapes HTML special characters
///
/// # Example
/// ```
/// use universe_signs_bot::utils::html::escape_html;
///
/// assert_eq!(escape_html("1 < 2 & 3 > 2"), "1 &lt; 2 &amp; 3 &gt; 2");
/// ```
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Splits `text` into chunks of at most `max_len` characters.
///
/// Chunks break on line boundaries so tags opened and closed on the same
/// line stay balanced. A single line longer than `max_len` is cut by
/// characters.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let separator = usize::from(!current.is_empty());

        if current_len + separator + line_len <= max_len {
            if separator == 1 {
                current.push('\n');
            }
            current.push_str(line);
            current_len += separator + line_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= max_len {
            current.push_str(line);
            current_len = line_len;
        } else {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_len) {
                chunks.push(piece.iter().collect());
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
