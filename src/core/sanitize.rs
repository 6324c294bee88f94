// src/core/sanitize.rs

/// Characters that would break a plain comma-delimited row.
const CSV_BREAKERS: [char; 4] = [',', '"', '\n', '\r'];

/// Strip every comma, double quote, CR and LF. Nothing else is touched.
pub fn clean(s: &str) -> String {
    s.chars().filter(|c| !CSV_BREAKERS.contains(c)).collect()
}

/// Paper title → file stem. Keeps ASCII alphanumerics, `-` and `_`,
/// turns whitespace runs into a single `_`, falls back to `fallback`.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' || ch == '_' { if !(last_us && ch == '_') { out.push(ch); } last_us = ch == '_'; }
    }
    let out = out.trim_matches('_');
    if out.is_empty() { s!(fallback) } else { s!(out) }
}
