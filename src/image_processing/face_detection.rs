use anyhow::Result;
use image::RgbImage;
use std::path::Path;

use super::geometry::FaceRect;

/// Detection parameters fixed for the whole run
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    /// Faces smaller than this (in pixels) are ignored
    pub min_face_size: u32,
    /// Classifier score a window needs to count as a face
    pub score_threshold: f64,
    /// Scale factor between two levels of the image pyramid (0.0-1.0)
    pub pyramid_scale_factor: f32,
    /// Sliding window step, in pixels, on both axes
    pub window_step: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_face_size: 30,
            score_threshold: 2.0,
            pyramid_scale_factor: 0.8,
            window_step: 4,
        }
    }
}

/// Pluggable face detection backend.
///
/// Implementations receive the decoded RGB pixels of one image and return the
/// faces found, in absolute pixel coordinates. An empty vector means no faces.
/// Backends are shared across worker threads, so they must not hold per-call
/// mutable state behind `&self`.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, img: &RgbImage) -> Result<Vec<FaceRect>>;

    /// Short backend name for diagnostics
    fn name(&self) -> &'static str;
}

/// Detector used when no model is configured: never finds a face, so every
/// image goes through the center-crop path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFaceDetector;

impl FaceDetector for NoFaceDetector {
    fn detect(&self, _img: &RgbImage) -> Result<Vec<FaceRect>> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "none (center crop)"
    }
}

/// Build the detector for a run.
///
/// A model path selects the SeetaFace backend; without one the run falls back
/// to center cropping.
pub fn create_detector(
    model_path: Option<&Path>,
    params: &DetectionParams,
) -> Result<Box<dyn FaceDetector>> {
    match model_path {
        #[cfg(feature = "face-detection")]
        Some(path) => {
            let detector = super::rustface_backend::RustfaceDetector::from_path(path, params.clone())?;
            Ok(Box::new(detector))
        }
        #[cfg(not(feature = "face-detection"))]
        Some(path) => {
            let _ = params;
            Err(anyhow::anyhow!(
                "Face model {} given, but face detection is not available. \
                 Rebuild with --features face-detection",
                path.display()
            ))
        }
        None => Ok(Box::new(NoFaceDetector)),
    }
}
