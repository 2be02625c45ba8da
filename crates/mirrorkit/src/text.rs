//! Small string helpers shared by the mirror jobs

/// Cuts everything up to and including the first occurrence of `prefix`
///
/// Unlike `str::strip_prefix`, the match may sit anywhere in the string;
/// the text before it is discarded together with the match. No occurrence
/// returns the input unchanged.
pub fn remove_prefix<'a>(text: &'a str, prefix: &str) -> &'a str {
    match text.find(prefix) {
        Some(pos) => &text[pos + prefix.len()..],
        None => text,
    }
}

/// Cuts everything from the last occurrence of `suffix` onward
///
/// No occurrence returns the input unchanged.
pub fn remove_suffix<'a>(text: &'a str, suffix: &str) -> &'a str {
    match text.rfind(suffix) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Backslash-escapes characters that Markdown would interpret (`\`, `<`, `>`)
///
/// For embedding arbitrary text (names, descriptions) into generated
/// Markdown as plain text.
pub fn format_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Formats a byte count as a human-readable size (B/KB/MB/GB/TB, ≤ 2 decimals)
pub fn pretty_file_size(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = size as f64;
    let mut unit = UNITS[0];
    for candidate in UNITS {
        unit = candidate;
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
    }

    let mut text = format!("{:.2}", (value * 100.0).round() / 100.0);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{}{}", text, unit)
}
