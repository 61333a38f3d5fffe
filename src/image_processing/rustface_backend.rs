use anyhow::{Context, Result};
use image::{imageops, RgbImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::face_detection::{DetectionParams, FaceDetector};
use super::geometry::FaceRect;

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read once when the detector is built and cloned into a fresh
/// `rustface` detector for each image, since those detect through `&mut self`.
pub struct RustfaceDetector {
    model: rustface::Model,
    params: DetectionParams,
}

impl RustfaceDetector {
    /// Load a SeetaFace model file (e.g. `seeta_fd_frontal_v1.0.bin`)
    pub fn from_path(model_path: &Path, params: DetectionParams) -> Result<Self> {
        let file = File::open(model_path)
            .with_context(|| format!("Failed to open face model: {}", model_path.display()))?;
        let model = rustface::read_model(BufReader::new(file))
            .with_context(|| format!("Failed to load face model: {}", model_path.display()))?;

        Ok(Self { model, params })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, img: &RgbImage) -> Result<Vec<FaceRect>> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.params.min_face_size);
        detector.set_score_thresh(self.params.score_threshold);
        detector.set_pyramid_scale_factor(self.params.pyramid_scale_factor);
        detector.set_slide_window_step(self.params.window_step, self.params.window_step);

        let gray = imageops::grayscale(img);
        let (width, height) = gray.dimensions();
        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRect::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "rustface (SeetaFace)"
    }
}
