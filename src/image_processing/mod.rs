pub mod batch;
pub mod crop_plan;
pub mod debug_overlay;
pub mod encode;
pub mod face_detection;
pub mod geometry;
pub mod head_region;
pub mod resize;
#[cfg(feature = "face-detection")]
pub mod rustface_backend;

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::utils::{create_output_filename, has_valid_extension, verbose_println};

pub use face_detection::{create_detector, DetectionParams, FaceDetector, NoFaceDetector};
pub use geometry::{FaceRect, Region, TargetSpec};

use batch::BatchProcessor;

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub target: TargetSpec,
    pub extensions: Vec<String>,
    pub output_prefix: String,
    pub jpeg_quality: u8,
    pub parallel_jobs: usize,
    pub verbose: bool,
    pub dry_run: bool,
    pub debug: bool,
    pub skip_existing: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            target: TargetSpec::default(),
            extensions: ["jpg", "jpeg", "png", "bmp", "gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            output_prefix: "resized_".to_string(),
            jpeg_quality: encode::DEFAULT_JPEG_QUALITY,
            parallel_jobs: 1,
            verbose: false,
            dry_run: false,
            debug: false,
            skip_existing: false,
        }
    }
}

/// Everything decided about one image before pixels are touched
#[derive(Debug, Clone, PartialEq)]
pub struct CropDecision {
    pub source_size: (u32, u32),
    pub faces: Vec<FaceRect>,
    pub head_region: Option<Region>,
    pub crop: Region,
}

impl CropDecision {
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_center_crop(&self) -> bool {
        self.head_region.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Cropped, resized and written
    Written(CropDecision),
    /// Dry run: planned only
    Planned(CropDecision),
    /// Output already existed
    Skipped,
}

#[derive(Debug)]
pub struct ProcessingResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub debug_path: Option<PathBuf>,
    pub outcome: FileOutcome,
    pub processing_time: Duration,
}

impl ProcessingResult {
    pub fn decision(&self) -> Option<&CropDecision> {
        match &self.outcome {
            FileOutcome::Written(decision) | FileOutcome::Planned(decision) => Some(decision),
            FileOutcome::Skipped => None,
        }
    }
}

/// Runs the decode → detect → estimate → plan → crop → resize → encode
/// pipeline over a batch of files.
///
/// The detector is built by the caller and owned by the engine for the whole
/// run. Each file is processed independently; one failure never stops the batch.
pub struct ProcessingEngine {
    config: ProcessingConfig,
    detector: Box<dyn FaceDetector>,
    pool: Option<rayon::ThreadPool>,
}

impl ProcessingEngine {
    pub fn new(config: ProcessingConfig, detector: Box<dyn FaceDetector>) -> Result<Self> {
        // A dedicated pool only when more than one job is requested
        let pool = if config.parallel_jobs > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.parallel_jobs)
                    .build()
                    .context("Failed to initialize thread pool")?,
            )
        } else {
            None
        };

        Ok(Self {
            config,
            detector,
            pool,
        })
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// List the image files directly inside `input_dir` (no recursion), sorted by path
    pub fn discover_images(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        verbose_println(
            self.config.verbose,
            &format!("Scanning directory: {}", input_dir.display()),
        );

        let mut image_files = Vec::new();
        let walker = WalkDir::new(input_dir)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1);

        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to read directory: {}", input_dir.display()))?;
            let path = entry.path();

            if entry.file_type().is_file() && has_valid_extension(path, &self.config.extensions) {
                image_files.push(path.to_path_buf());
            }
        }

        image_files.sort();

        verbose_println(
            self.config.verbose,
            &format!("Found {} image files", image_files.len()),
        );
        Ok(image_files)
    }

    /// Process every file, reporting each finished file through `progress_callback`.
    ///
    /// Results come back in the order of `image_files` whatever the job count.
    pub fn process_batch<F>(
        &self,
        image_files: &[PathBuf],
        output_dir: &Path,
        progress_callback: F,
    ) -> Vec<Result<ProcessingResult>>
    where
        F: Fn(usize, &Path, &Result<ProcessingResult>) + Send + Sync,
    {
        let processor = BatchProcessor::new(image_files.len());

        let run_one = |image_path: &PathBuf| {
            let result = self.process_single_image(image_path, output_dir);
            let count = processor.increment();
            progress_callback(count, image_path, &result);
            result
        };

        let results: Vec<Result<ProcessingResult>> = match &self.pool {
            Some(pool) => pool.install(|| image_files.par_iter().map(run_one).collect()),
            None => image_files.iter().map(run_one).collect(),
        };

        verbose_println(
            self.config.verbose,
            &format!(
                "Batch finished: {:.0}% of {} files at {:.2} files/s",
                processor.progress() * 100.0,
                processor.total_files(),
                processor.items_per_second()
            ),
        );
        results
    }

    /// Run the full pipeline on one file
    pub fn process_single_image(&self, input_path: &Path, output_dir: &Path) -> Result<ProcessingResult> {
        let start = Instant::now();
        verbose_println(
            self.config.verbose,
            &format!("Processing: {}", input_path.display()),
        );

        let output_filename = create_output_filename(input_path, &self.config.output_prefix)?;
        let output_path = output_dir.join(&output_filename);
        encode::output_format(&output_path)?;

        if self.config.skip_existing && output_path.exists() {
            verbose_println(
                self.config.verbose,
                &format!("Skipping, output exists: {}", output_path.display()),
            );
            return Ok(ProcessingResult {
                input_path: input_path.to_path_buf(),
                output_path,
                debug_path: None,
                outcome: FileOutcome::Skipped,
                processing_time: start.elapsed(),
            });
        }

        let img = image::open(input_path)
            .with_context(|| format!("Failed to open image: {}", input_path.display()))?;
        let rgb_img = img.to_rgb8();

        let decision = self.plan_crop(&rgb_img, input_path)?;

        let debug_path = if self.config.debug && !self.config.dry_run {
            let path = output_dir.join(create_output_filename(input_path, "debug_")?);
            let overlay = debug_overlay::draw_crop_decision(
                &rgb_img,
                &decision.faces,
                decision.head_region.as_ref(),
                &decision.crop,
            );
            encode::save_image(&overlay, &path, self.config.jpeg_quality)?;
            Some(path)
        } else {
            None
        };

        if self.config.dry_run {
            return Ok(ProcessingResult {
                input_path: input_path.to_path_buf(),
                output_path,
                debug_path,
                outcome: FileOutcome::Planned(decision),
                processing_time: start.elapsed(),
            });
        }

        let output = resize::crop_and_resize(&rgb_img, &decision.crop, self.config.target)?;
        encode::save_image(&output, &output_path, self.config.jpeg_quality)?;

        verbose_println(
            self.config.verbose,
            &format!("Saved resized image to {}", output_path.display()),
        );

        Ok(ProcessingResult {
            input_path: input_path.to_path_buf(),
            output_path,
            debug_path,
            outcome: FileOutcome::Written(decision),
            processing_time: start.elapsed(),
        })
    }

    /// Detect faces, estimate the head region and plan the crop for a decoded image
    pub fn plan_crop(&self, img: &image::RgbImage, input_path: &Path) -> Result<CropDecision> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(anyhow::anyhow!(
                "Image has zero dimensions: {}",
                input_path.display()
            ));
        }

        let faces = self
            .detector
            .detect(img)
            .with_context(|| format!("Face detection failed: {}", input_path.display()))?;

        let head_region = head_region::estimate(&faces, width, height);
        let crop = crop_plan::plan(width, height, self.config.target, head_region.as_ref());

        verbose_println(
            self.config.verbose,
            &format!(
                "{}x{}: {} face(s), head region {:?}, crop ({},{})-({},{})",
                width,
                height,
                faces.len(),
                head_region,
                crop.x_min,
                crop.y_min,
                crop.x_max,
                crop.y_max
            ),
        );

        Ok(CropDecision {
            source_size: (width, height),
            faces,
            head_region,
            crop,
        })
    }
}
