//! Property-based tests for HTML entity decoding and metadata extraction.
//!
//! These tests verify the decoder for arbitrary text: plain text passes
//! through, escaped text decodes back to the original, and extracted titles
//! come back trimmed and decoded.

use pinboard::services::metadata_extractor::{decode_html_entities, extract_metadata};
use proptest::prelude::*;

/// Escapes the characters the decoder understands, the way a page author would.
fn escape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c if !c.is_ascii() => format!("&#x{:x};", c as u32),
            c => c.to_string(),
        })
        .collect()
}

// **Text without ampersands is unchanged**
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn text_without_ampersand_is_unchanged(text in "[^&]{0,60}") {
        prop_assert_eq!(decode_html_entities(&text), text);
    }
}

// **Escaping then decoding restores the text**
//
// *For any* text, escaping the five special characters and every non-ASCII
// character then decoding SHALL return the original text, because decoding
// runs in a single pass.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn escaped_text_decodes_to_original(text in "\\PC{0,40}") {
        prop_assert_eq!(decode_html_entities(&escape(&text)), text);
    }

    #[test]
    fn numeric_reference_decodes_scalar(c in any::<char>()) {
        prop_assert_eq!(decode_html_entities(&format!("&#{};", c as u32)), c.to_string());
        prop_assert_eq!(decode_html_entities(&format!("&#x{:X};", c as u32)), c.to_string());
    }
}

// **Extracted titles are trimmed and decoded**
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn title_is_trimmed_and_decoded(
        title in "[A-Za-z0-9][A-Za-z0-9 &'\"]{0,30}[A-Za-z0-9]",
        pad in " {0,3}",
    ) {
        let html = format!("<html><head><title>{pad}{}{pad}</title></head></html>", escape(&title));
        prop_assert_eq!(extract_metadata(&html).title, title);
    }
}
