//! Zero-width encoding.
//!
//! Each character of the watermark id is expanded into the base-4 digits of its
//! code point, and each digit maps to one of four invisible Unicode marks. The
//! full sequence is inserted after the first paragraph, periodically at
//! sentence boundaries, and before the final paragraph, so it survives partial
//! copies of the text.

/// The four invisible marks, indexed by base-4 digit.
pub const ZERO_WIDTH_MARKS: [char; 4] = [
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{FEFF}', // zero-width no-break space
];

/// Minimum distance in bytes between periodic insertions.
const INSERT_INTERVAL: usize = 1000;

/// Encode the id as a zero-width mark sequence.
pub fn encode_id(id: &str) -> String {
    let mut out = String::new();
    for c in id.chars() {
        let mut code = c as u32;
        let mut digits = [0usize; 16];
        let mut n = 0;
        if code == 0 {
            n = 1;
        }
        while code > 0 {
            digits[n] = (code % 4) as usize;
            code /= 4;
            n += 1;
        }
        for i in (0..n).rev() {
            out.push(ZERO_WIDTH_MARKS[digits[i]]);
        }
    }
    out
}

/// Byte offsets at which the sequence is inserted. Always at least one, so a
/// text without paragraph breaks still carries the full mark.
fn insertion_points(text: &str) -> Vec<usize> {
    let mut points = Vec::new();

    if let Some(first_break) = text.find("\n\n") {
        points.push(first_break);
    }

    let mut last = points.first().copied().unwrap_or(0);
    for (i, _) in text.match_indices(". ") {
        let after = i + 2;
        if after.saturating_sub(last) >= INSERT_INTERVAL {
            points.push(after);
            last = after;
        }
    }

    if let Some(last_break) = text.rfind("\n\n") {
        points.push(last_break);
    }

    if points.is_empty() {
        points.push(text.len());
    }

    points.sort_unstable();
    points.dedup();
    points
}

/// Insert the zero-width sequence for `id` into `text`.
pub fn insert_marks(text: &str, id: &str) -> String {
    let seq = encode_id(id);
    if seq.is_empty() {
        return text.to_string();
    }

    let points = insertion_points(text);
    let mut out = String::with_capacity(text.len() + seq.len() * points.len() * 3);
    let mut prev = 0;
    for p in points {
        out.push_str(&text[prev..p]);
        out.push_str(&seq);
        prev = p;
    }
    out.push_str(&text[prev..]);
    out
}

/// Whether any zero-width mark is present at all.
pub fn contains_marks(text: &str) -> bool {
    text.chars().any(|c| ZERO_WIDTH_MARKS.contains(&c))
}

/// Whether the exact sequence for `id` is present.
pub fn contains_sequence(text: &str, id: &str) -> bool {
    if id.is_empty() {
        return false;
    }
    text.contains(&encode_id(id))
}

/// Remove all zero-width marks.
pub fn strip_marks(text: &str) -> String {
    text.chars()
        .filter(|c| !ZERO_WIDTH_MARKS.contains(c))
        .collect()
}
