// ============================================================
// Layer 4 — Entity Span Reconstruction
// ============================================================
// RadGraph entities point into the report text by word index,
// where words are the whitespace-split tokens of the text:
//
//   text:   "small left pleural effusion"
//   words:   0     1    2       3
//   span (2, 3) → "pleural effusion"
//
// Both indices are inclusive.

/// Returned when a single-word span points outside the text
pub const OUT_OF_RANGE: &str = "Index out of range";

/// Rebuild the text covered by `[start_ix, end_ix]`.
///
/// * `start_ix == end_ix`: the single word, or `OUT_OF_RANGE`
/// * otherwise: the words joined by one space, or `""` if the range
///   is invalid (negative start, start after end, end past the text)
pub fn get_text_span(text: &str, start_ix: i64, end_ix: i64) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let count = words.len() as i64;

    if start_ix == end_ix {
        return if (0..count).contains(&start_ix) {
            words[start_ix as usize].to_string()
        } else {
            OUT_OF_RANGE.to_string()
        };
    }

    if start_ix < 0 || start_ix > end_ix || end_ix >= count {
        return String::new();
    }

    words[start_ix as usize..=end_ix as usize].join(" ")
}
