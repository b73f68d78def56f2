use std::ffi::CString;
use std::fmt::Display;

use leptess::tesseract::TessApi;
use opencv::prelude::*;
use tracing::debug;

use crate::config::DetectorConfig;
use crate::error::PlateDwellError;
use crate::plate_detection::display_text;

/// Page segmentation modes tried per candidate: whole line, single word,
/// uniform block.
const PAGE_SEG_MODES: [&str; 3] = ["7", "8", "6"];
const CHAR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LANGUAGES: &str = "eng+ara";

/// Outcome of reading one enhanced candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    Recognized { text: String, confidence: i32 },
    NoReading,
}

pub struct PlateReader {
    ocr: TessApi,
    min_confidence: i32,
    min_plate_chars: usize,
    max_plate_chars: usize,
}

impl PlateReader {
    pub fn new(config: &DetectorConfig) -> Result<Self, PlateDwellError> {
        let mut ocr = TessApi::new(None, LANGUAGES).map_err(ocr_err)?;
        let whitelist_key = CString::new("tessedit_char_whitelist").map_err(ocr_err)?;
        let whitelist = CString::new(CHAR_WHITELIST).map_err(ocr_err)?;
        ocr.raw
            .set_variable(&whitelist_key, &whitelist)
            .map_err(ocr_err)?;
        Ok(Self {
            ocr,
            min_confidence: config.min_confidence,
            min_plate_chars: config.min_plate_chars,
            max_plate_chars: config.max_plate_chars,
        })
    }

    /// Best-effort read: engine failures are downgraded to `NoReading` at
    /// this boundary. `try_read` keeps them observable.
    pub fn read(&mut self, enhanced: &Mat) -> OcrOutcome {
        match self.try_read(enhanced) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!("ocr pass failed: {err}");
                OcrOutcome::NoReading
            }
        }
    }

    /// Runs every page-segmentation pass over the candidate and keeps the
    /// best accepted token across all of them.
    pub fn try_read(&mut self, enhanced: &Mat) -> Result<OcrOutcome, PlateDwellError> {
        if enhanced.empty() {
            return Ok(OcrOutcome::NoReading);
        }
        let cols = enhanced.cols();
        let rows = enhanced.rows();
        let psm_key = CString::new("tessedit_pageseg_mode").map_err(ocr_err)?;

        let mut best: Option<(String, i32)> = None;
        for mode in PAGE_SEG_MODES {
            let psm = CString::new(mode).map_err(ocr_err)?;
            self.ocr.raw.set_variable(&psm_key, &psm).map_err(ocr_err)?;
            self.ocr
                .raw
                .set_image(enhanced.data_bytes()?, cols, rows, 1, cols)
                .map_err(ocr_err)?;
            let text = self.ocr.get_utf8_text().map_err(ocr_err)?;
            let confidence = self.ocr.mean_text_conf();
            for token in text.split_whitespace() {
                best = select_token(
                    best,
                    token,
                    confidence,
                    self.min_confidence,
                    self.min_plate_chars,
                    self.max_plate_chars,
                );
            }
        }

        Ok(match best {
            Some((text, confidence)) => {
                let display = display_text::reorder(&text).unwrap_or(text);
                OcrOutcome::Recognized {
                    text: display,
                    confidence,
                }
            }
            None => OcrOutcome::NoReading,
        })
    }
}

fn ocr_err<E: Display>(err: E) -> PlateDwellError {
    PlateDwellError::Ocr(err.to_string())
}

/// Applies the token filters and keeps the highest-confidence winner.
/// Replacement requires strictly greater confidence, so the first token seen
/// at a given confidence wins ties.
fn select_token(
    best: Option<(String, i32)>,
    token: &str,
    confidence: i32,
    min_confidence: i32,
    min_chars: usize,
    max_chars: usize,
) -> Option<(String, i32)> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return best;
    }
    if let Some((_, best_confidence)) = &best {
        if confidence <= *best_confidence {
            return best;
        }
    }
    if confidence <= min_confidence {
        return best;
    }
    let filtered: String = trimmed.chars().filter(|c| c.is_alphanumeric()).collect();
    let length = filtered.chars().count();
    if length < min_chars || length > max_chars {
        return best;
    }
    if !filtered.chars().any(|c| c.is_ascii_digit()) {
        return best;
    }
    Some((filtered, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(tokens: &[(&str, i32)]) -> Option<(String, i32)> {
        let mut best = None;
        for (token, confidence) in tokens {
            best = select_token(best, token, *confidence, 30, 4, 10);
        }
        best
    }

    #[test]
    fn keeps_highest_confidence_token() {
        let best = pick(&[("AB12", 40), ("CD34", 70), ("EF56", 55)]);
        assert_eq!(best, Some(("CD34".to_string(), 70)));
    }

    #[test]
    fn first_seen_wins_ties() {
        let best = pick(&[("AB12", 70), ("CD34", 70)]);
        assert_eq!(best, Some(("AB12".to_string(), 70)));
    }

    #[test]
    fn rejects_low_confidence() {
        assert_eq!(pick(&[("AB12", 30)]), None);
        assert_eq!(pick(&[("AB12", 29)]), None);
    }

    #[test]
    fn rejects_tokens_without_a_digit() {
        assert_eq!(pick(&[("ABCD", 80)]), None);
        assert_eq!(pick(&[("ABC1", 80)]), Some(("ABC1".to_string(), 80)));
    }

    #[test]
    fn enforces_filtered_length_bounds() {
        assert_eq!(pick(&[("A1", 80)]), None);
        assert_eq!(pick(&[("A1B2C3D4E5F", 80)]), None);
        assert_eq!(pick(&[("A1B2C3D4E5", 80)]), Some(("A1B2C3D4E5".to_string(), 80)));
    }

    #[test]
    fn strips_non_alphanumerics_before_filtering() {
        // "AB-12" filters to "AB12": 4 chars, accepted.
        assert_eq!(pick(&[("AB-12", 80)]), Some(("AB12".to_string(), 80)));
        // "A-1" filters to "A1": too short even though the raw token is 3 chars.
        assert_eq!(pick(&[("A-1", 80)]), None);
    }

    #[test]
    fn empty_tokens_are_ignored() {
        assert_eq!(pick(&[("   ", 90)]), None);
    }
}
