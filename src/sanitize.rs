use crate::prompt::ASSISTANT_MARKER;

/// Turns raw generated text into the enriched prompt.
///
/// Everything up to and including the last assistant marker is dropped (and
/// the remainder trimmed), then only period-terminated segments are kept.
pub fn sanitize_completion(raw: &str) -> String {
    complete_sentences(strip_to_reply(raw))
}

/// Returns the text after the last [`ASSISTANT_MARKER`], trimmed. Text without
/// a marker is returned untouched.
pub fn strip_to_reply(raw: &str) -> &str {
    match raw.rfind(ASSISTANT_MARKER) {
        Some(idx) => raw[idx + ASSISTANT_MARKER.len()..].trim_matches(is_strippable),
        None => raw,
    }
}

// Whitespace plus the ASCII information separators U+001C..=U+001F.
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Keeps every run of text ending in `.`, concatenated in order. A trailing
/// fragment without a period is discarded; no period at all yields "".
pub fn complete_sentences(text: &str) -> String {
    text.split_inclusive('.')
        .filter(|segment| segment.ends_with('.'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_text_is_unchanged() {
        for text in ["A cat.", "A cat. A dog.", " leading space. trailing.", "..."] {
            assert_eq!(sanitize_completion(text), text);
        }
    }

    #[test]
    fn text_without_period_becomes_empty() {
        for text in ["", "no period here", "   ", "A dog is br", "<|assistant|> cut off"] {
            assert_eq!(sanitize_completion(text), "");
        }
    }

    #[test]
    fn strips_through_last_marker() {
        let raw = "<noise><|assistant|> One thing. Two thing.";
        assert_eq!(sanitize_completion(raw), "One thing. Two thing.");
    }

    #[test]
    fn only_last_marker_counts() {
        let raw = "<|assistant|> first. <|assistant|>\n second. ";
        assert_eq!(sanitize_completion(raw), "second.");
    }

    #[test]
    fn information_separators_are_trimmed_after_marker() {
        let raw = "<|assistant|>\u{1c} A. B.\u{1f}\n";
        assert_eq!(sanitize_completion(raw), "A. B.");
    }

    #[test]
    fn drops_trailing_fragment() {
        assert_eq!(sanitize_completion("A cat. A dog is br"), "A cat.");
    }

    #[test]
    fn periods_split_naively() {
        // Decimals and abbreviations are not special-cased.
        assert_eq!(
            complete_sentences("It is 2.5 cm wide. Made by Dr"),
            "It is 2.5 cm wide."
        );
        assert_eq!(complete_sentences("Approx. 3 cm"), "Approx.");
    }

    #[test]
    fn whitespace_is_not_trimmed_without_marker() {
        assert_eq!(strip_to_reply("  A cat.  "), "  A cat.  ");
        assert_eq!(sanitize_completion("  A cat.  "), "  A cat.");
    }
}
