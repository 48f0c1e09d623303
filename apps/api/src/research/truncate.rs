//! Sentence-aware truncation for fetched page text.

/// A period at or beyond this fraction of the budget is a good enough place to cut.
const SENTENCE_CUT_RATIO: f64 = 0.7;

/// Trims `text` to at most `max_chars` characters, preferring to end on a
/// sentence boundary.
///
/// Text that already fits is returned unchanged. Otherwise the hard prefix is
/// scanned backwards for its last period; if that period sits at or after 70%
/// of the budget the cut happens right after it, else the hard prefix is
/// returned as-is.
pub fn truncate_smart(text: &str, max_chars: usize) -> &str {
    let cut = match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => byte_idx,
        None => return text,
    };
    let truncated = &text[..cut];

    let min_period_at = max_chars as f64 * SENTENCE_CUT_RATIO;
    match truncated.rfind('.') {
        Some(pos) if truncated[..pos].chars().count() as f64 >= min_period_at => &truncated[..=pos],
        _ => truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(truncate_smart("Acme builds rockets.", 100), "Acme builds rockets.");
        assert_eq!(truncate_smart("", 10), "");
    }

    #[test]
    fn test_text_exactly_at_limit_is_unchanged() {
        let text = "abcdefghij";
        assert_eq!(truncate_smart(text, 10), text);
    }

    #[test]
    fn test_cuts_at_period_in_last_thirty_percent() {
        // period at index 8 of a 10-char window (>= 7)
        let text = "abcdefgh. and then some more words";
        assert_eq!(truncate_smart(text, 10), "abcdefgh.");
    }

    #[test]
    fn test_period_exactly_at_seventy_percent_counts() {
        // period at char index 7 of a 10-char window
        let text = "abcdefg.ijklmnop";
        assert_eq!(truncate_smart(text, 10), "abcdefg.");
    }

    #[test]
    fn test_early_period_falls_back_to_hard_cut() {
        let text = "Hi. this sentence keeps going without stopping";
        assert_eq!(truncate_smart(text, 20), "Hi. this sentence ke");
    }

    #[test]
    fn test_no_period_hard_cut() {
        let text = "no terminator anywhere in this text";
        assert_eq!(truncate_smart(text, 13), "no terminator");
    }

    #[test]
    fn test_multibyte_text_counts_characters() {
        let text = "日本語のテキストです。さらに続く文章があります";
        let out = truncate_smart(text, 12);
        // a full-width stop is not a sentence terminator here
        assert_eq!(out, "日本語のテキストです。さ");
        assert!(out.chars().count() <= 12);
    }

    #[test]
    fn test_output_never_exceeds_budget() {
        let text = "One. Two sentences here. Three is a longer sentence. Four? Five!".repeat(5);
        for max in 1..text.len() {
            let out = truncate_smart(&text, max);
            assert!(out.chars().count() <= max, "max={max} got {}", out.chars().count());
            assert!(text.starts_with(out));

            let window: String = text.chars().take(max).collect();
            if let Some(pos) = window.rfind('.') {
                if pos as f64 >= max as f64 * 0.7 && text.chars().count() > max {
                    assert!(out.ends_with('.'), "max={max} out={out:?}");
                }
            }
        }
    }
}
