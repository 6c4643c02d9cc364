const MAX_VISIBLE_CHARS: usize = 100;

const SECRET_MARKERS: [&str; 5] = ["Bearer ", "api_key=", "key=", "password=", "token="];

/// Log-safe rendition of user text: whitespace collapsed onto one line,
/// truncated on a char boundary, credential-looking values masked.
pub fn sanitize_prompt(prompt: &str) -> String {
    let collapsed = prompt.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = collapsed.chars().count();
    let visible = if total_chars > MAX_VISIBLE_CHARS {
        let cut: String = collapsed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{cut}... ({total_chars} chars total)")
    } else {
        collapsed
    };

    SECRET_MARKERS
        .iter()
        .fold(visible, |text, marker| redact_after(&text, marker))
}

fn redact_after(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(marker) {
        let value_start = idx + marker.len();
        out.push_str(&rest[..value_start]);

        let tail = &rest[value_start..];
        let value_len = tail
            .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
            .unwrap_or(tail.len());

        if value_len > 0 && !tail.starts_with("[REDACTED]") {
            out.push_str("[REDACTED]");
        } else {
            out.push_str(&tail[..value_len]);
        }
        rest = &tail[value_len..];
    }

    out.push_str(rest);
    out
}
