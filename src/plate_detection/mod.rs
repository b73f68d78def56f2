pub mod camera;
pub mod display_text;
pub mod locator;
pub mod overlay;
pub mod reader;
pub mod region;
pub mod tracker;

use opencv::core::Rect;
use opencv::prelude::*;

/// One plate-shaped region found in the scan window. Lives for a single
/// frame iteration.
pub struct PlateCandidate {
    /// Bounding box in region-local coordinates.
    pub bbox: Rect,
    /// Binarized, morphologically cleaned crop fed to the OCR engine.
    pub enhanced: Mat,
    /// Untouched crop of the scan region.
    pub original: Mat,
}

impl PlateCandidate {
    pub(crate) fn new(bbox: Rect, enhanced: Mat, original: Mat) -> Self {
        Self {
            bbox,
            enhanced,
            original,
        }
    }
}
