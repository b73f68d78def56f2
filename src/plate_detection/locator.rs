use opencv::core::{Point, Rect, Size, Vector, BORDER_CONSTANT, BORDER_DEFAULT};
use opencv::imgproc;
use opencv::prelude::*;

use crate::config::DetectorConfig;
use crate::error::Result;
use crate::plate_detection::PlateCandidate;

const CLAHE_CLIP_LIMIT: f64 = 2.0;
const CLAHE_TILE: i32 = 8;
const BLUR_KERNEL: i32 = 5;
const CANNY_LOW: f64 = 50.0;
const CANNY_HIGH: f64 = 150.0;
const POLY_EPSILON_RATIO: f64 = 0.02;
const THRESH_BLOCK_SIZE: i32 = 11;
const THRESH_C: f64 = 2.0;
const MORPH_KERNEL: i32 = 3;

/// Contour-based plate search over the scan region.
pub struct PlateLocator {
    min_aspect_ratio: f64,
    max_aspect_ratio: f64,
    min_plate_area: i32,
    min_ocr_width: i32,
    max_contours: usize,
}

impl PlateLocator {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            min_aspect_ratio: config.min_aspect_ratio,
            max_aspect_ratio: config.max_aspect_ratio,
            min_plate_area: config.min_plate_area,
            min_ocr_width: config.min_ocr_width,
            max_contours: config.max_contours,
        }
    }

    /// Plate-shaped quadrilaterals in the region, largest contour first.
    /// Read-only on the input; returns an empty list when nothing qualifies.
    pub fn locate(&self, region: &Mat) -> Result<Vec<PlateCandidate>> {
        let mut gray = Mat::default();
        imgproc::cvt_color(region, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;
        let mut equalized = Mat::default();
        let mut clahe = imgproc::create_clahe(CLAHE_CLIP_LIMIT, Size::new(CLAHE_TILE, CLAHE_TILE))?;
        clahe.apply(&gray, &mut equalized)?;
        let mut blurred = Mat::default();
        imgproc::gaussian_blur(
            &equalized,
            &mut blurred,
            Size::new(BLUR_KERNEL, BLUR_KERNEL),
            0.0,
            0.0,
            BORDER_DEFAULT,
        )?;
        let mut edges = Mat::default();
        imgproc::canny(&blurred, &mut edges, CANNY_LOW, CANNY_HIGH, 3, false)?;

        let mut contours = Vector::<Vector<Point>>::new();
        imgproc::find_contours(
            &edges,
            &mut contours,
            imgproc::RETR_LIST,
            imgproc::CHAIN_APPROX_SIMPLE,
            Point::new(0, 0),
        )?;

        let mut ranked: Vec<(f64, Vector<Point>)> = Vec::with_capacity(contours.len());
        for contour in contours {
            let area = imgproc::contour_area(&contour, false)?;
            ranked.push((area, contour));
        }
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(self.max_contours);

        let mut candidates = Vec::new();
        for (_, contour) in &ranked {
            let perimeter = imgproc::arc_length(contour, true)?;
            let mut approx = Vector::<Point>::new();
            imgproc::approx_poly_dp(contour, &mut approx, POLY_EPSILON_RATIO * perimeter, true)?;
            if approx.len() != 4 {
                continue;
            }
            let bbox = imgproc::bounding_rect(contour)?;
            if !self.is_plate_shaped(bbox) {
                continue;
            }
            let crop = Mat::roi(region, bbox)?.try_clone()?;
            if let Some(enhanced) = self.enhance(&crop)? {
                candidates.push(PlateCandidate::new(bbox, enhanced, crop));
            }
        }
        Ok(candidates)
    }

    /// Aspect-ratio and area gate for a candidate bounding box.
    pub fn is_plate_shaped(&self, bbox: Rect) -> bool {
        if bbox.height <= 0 {
            return false;
        }
        let aspect = bbox.width as f64 / bbox.height as f64;
        let area = bbox.width * bbox.height;
        aspect >= self.min_aspect_ratio
            && aspect <= self.max_aspect_ratio
            && area > self.min_plate_area
    }

    /// Normalizes a crop for OCR: upscale narrow crops, equalize, binarize,
    /// then morphologically clean. A degenerate (zero-size) crop yields
    /// `None` and is skipped by the caller.
    pub fn enhance(&self, plate: &Mat) -> Result<Option<Mat>> {
        if plate.empty() || plate.cols() == 0 || plate.rows() == 0 {
            return Ok(None);
        }

        let mut scaled = plate.try_clone()?;
        if plate.cols() < self.min_ocr_width {
            let scale = self.min_ocr_width as f64 / plate.cols() as f64;
            let mut resized = Mat::default();
            imgproc::resize(
                plate,
                &mut resized,
                Size::new(0, 0),
                scale,
                scale,
                imgproc::INTER_CUBIC,
            )?;
            scaled = resized;
        }

        let mut gray = Mat::default();
        imgproc::cvt_color(&scaled, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;
        let mut equalized = Mat::default();
        let mut clahe = imgproc::create_clahe(CLAHE_CLIP_LIMIT, Size::new(CLAHE_TILE, CLAHE_TILE))?;
        clahe.apply(&gray, &mut equalized)?;
        let mut blurred = Mat::default();
        imgproc::gaussian_blur(
            &equalized,
            &mut blurred,
            Size::new(BLUR_KERNEL, BLUR_KERNEL),
            0.0,
            0.0,
            BORDER_DEFAULT,
        )?;
        let mut thresholded = Mat::default();
        imgproc::adaptive_threshold(
            &blurred,
            &mut thresholded,
            255.0,
            imgproc::ADAPTIVE_THRESH_GAUSSIAN_C,
            imgproc::THRESH_BINARY_INV,
            THRESH_BLOCK_SIZE,
            THRESH_C,
        )?;

        let kernel = imgproc::get_structuring_element(
            imgproc::MORPH_RECT,
            Size::new(MORPH_KERNEL, MORPH_KERNEL),
            Point::new(-1, -1),
        )?;
        let border_value = imgproc::morphology_default_border_value()?;
        let mut closed = Mat::default();
        imgproc::morphology_ex(
            &thresholded,
            &mut closed,
            imgproc::MORPH_CLOSE,
            &kernel,
            Point::new(-1, -1),
            1,
            BORDER_CONSTANT,
            border_value,
        )?;
        let mut cleaned = Mat::default();
        imgproc::morphology_ex(
            &closed,
            &mut cleaned,
            imgproc::MORPH_OPEN,
            &kernel,
            Point::new(-1, -1),
            1,
            BORDER_CONSTANT,
            border_value,
        )?;

        Ok(Some(cleaned))
    }
}
