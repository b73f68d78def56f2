use thiserror::Error;
use unicode_bidi::BidiInfo;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("nothing to reorder")]
    Empty,
}

/// Reorders mixed-directionality text into display order. Callers fall back
/// to the raw text when this fails; that fallback is deliberate policy, not
/// error recovery.
pub fn reorder(text: &str) -> Result<String, ReorderError> {
    if text.is_empty() {
        return Err(ReorderError::Empty);
    }
    let bidi = BidiInfo::new(text, None);
    let paragraph = bidi.paragraphs.first().ok_or(ReorderError::Empty)?;
    let line = paragraph.range.clone();
    Ok(bidi.reorder_line(paragraph, line).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(reorder("ABC123").unwrap(), "ABC123");
    }

    #[test]
    fn rtl_text_is_reversed_for_display() {
        assert_eq!(reorder("שלום").unwrap(), "םולש");
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(reorder(""), Err(ReorderError::Empty));
    }
}
