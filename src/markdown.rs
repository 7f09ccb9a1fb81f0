/// Characters Telegram's MarkdownV2 dialect treats as markup.
const MARKDOWN_V2_SPECIAL: &str = "_*[]()~`>#+=|{}.!-";

/// Escape text for `parse_mode = MarkdownV2`.
///
/// Not idempotent: escaping already escaped text doubles the backslashes, so
/// escape each piece of raw text exactly once.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape `raw` and wrap it in an inline code span. The delimiters stay literal.
pub fn inline_code(raw: &str) -> String {
    format!("`{}`", escape_markdown(raw))
}
