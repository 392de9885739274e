//! Subject grouping and display colors.
//!
//! Events are grouped by a subject code pulled out of their summary, and
//! each subject gets a stable pastel color. The extraction policy, in order:
//!
//! 1. A course-style code: 3-4 capitals, a digit, then 3-6 capitals/digits
//!    (`COMP3122`, `EIE3333`, `CHC1CM15P`).
//! 2. The text before the first `-`, when it is 3-14 characters long.
//! 3. The first word, when it is longer than 3 characters and has a digit.
//! 4. The whole trimmed summary.

use std::sync::LazyLock;

use regex::Regex;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{3,4}[0-9][A-Z0-9]{3,6})\b").expect("subject code pattern is valid")
});

pub const PASTEL_COLORS: [&str; 25] = [
    "#cbd5e1", "#fca5a5", "#fdba74", "#fcd34d", "#86efac", "#6ee7b7", "#5eead4", "#67e8f9",
    "#7dd3fc", "#93c5fd", "#a5b4fc", "#c4b5fd", "#d8b4fe", "#f0abfc", "#fda4af", "#f87171",
    "#fb923c", "#fbbf24", "#a3e635", "#34d399", "#22d3ee", "#818cf8", "#a78bfa", "#e879f9",
    "#fb7185",
];

/// Grouping key for a summary (see module docs for the policy).
pub fn subject_code(summary: &str) -> String {
    let clean = summary.trim();
    if clean.is_empty() {
        return "default".to_string();
    }

    if let Some(code) = CODE_PATTERN.captures(clean).and_then(|c| c.get(1)) {
        return code.as_str().to_string();
    }

    if let Some((head, _)) = clean.split_once('-') {
        let head = head.trim();
        let len = head.chars().count();
        if len > 2 && len < 15 {
            return head.to_string();
        }
    }

    let first_word = clean.split(' ').next().unwrap_or(clean);
    if first_word.chars().count() > 3 && first_word.chars().any(|c| c.is_ascii_digit()) {
        return first_word.to_string();
    }

    clean.to_string()
}

/// Palette color for a summary, keyed by its subject code.
pub fn subject_color(summary: &str) -> &'static str {
    let key = subject_code(summary);
    let index = string_hash(&key).unsigned_abs() % PASTEL_COLORS.len() as u64;
    PASTEL_COLORS[index as usize]
}

/// `black` or `white`, whichever reads better on the given `#rrggbb` background.
pub fn contrast_color(hex: &str) -> &'static str {
    let hex = hex.trim_start_matches('#');
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map(f64::from)
            .unwrap_or(0.0)
    };

    let yiq = (channel(0) * 299.0 + channel(2) * 587.0 + channel(4) * 114.0) / 1000.0;
    if yiq >= 128.0 { "black" } else { "white" }
}

/// The classic `hash * 31 + c` string hash over UTF-16 units, with the shift
/// truncated to 32 bits the way browser palettes computed it, so colors stay
/// the same as the ones users already know.
fn string_hash(key: &str) -> i64 {
    key.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        i64::from(unit) + (shifted - hash)
    })
}
