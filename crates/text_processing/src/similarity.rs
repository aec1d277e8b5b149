//! Edit-distance similarity
//!
//! Normalized Levenshtein similarity used by the classifier and the location
//! extractor. Comparison is on raw characters: callers lowercase first.

use ingres_config::constants::text::MAX_TOKEN_CHARS;

/// Levenshtein edit distance between two strings, counted in characters
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let len_a = a_chars.len();
    let len_b = b_chars.len();

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    // Two rows of the (len_a + 1) x (len_b + 1) table
    let mut prev_row: Vec<usize> = (0..=len_b).collect();
    let mut curr_row: Vec<usize> = vec![0; len_b + 1];

    for i in 1..=len_a {
        curr_row[0] = i;
        for j in 1..=len_b {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len_b]
}

/// `1 - distance / max_len`, in `[0, 1]`
///
/// Two empty strings are identical (1.0); one empty string matches nothing
/// (0.0).
pub fn similarity(a: &str, b: &str) -> f32 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();

    match (len_a, len_b) {
        (0, 0) => 1.0,
        (0, _) | (_, 0) => 0.0,
        _ => {
            let distance = levenshtein_distance(a, b);
            1.0 - distance as f32 / len_a.max(len_b) as f32
        }
    }
}

/// `similarity(a, b) >= threshold`, skipping the table when the length gap
/// alone rules it out
pub fn is_similar(a: &str, b: &str, threshold: f32) -> bool {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let longest = len_a.max(len_b);

    if longest > 0 {
        let upper_bound = 1.0 - len_a.abs_diff(len_b) as f32 / longest as f32;
        if upper_bound < threshold {
            return false;
        }
    }

    similarity(a, b) >= threshold
}

/// Prefix of at most `MAX_TOKEN_CHARS` characters
pub fn capped(s: &str) -> &str {
    match s.char_indices().nth(MAX_TOKEN_CHARS) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}
