use clap::Parser;
use std::path::PathBuf;

use crate::image_processing::{DetectionParams, ProcessingConfig, TargetSpec};

pub const DEFAULT_INPUT_DIR: &str = "pics_in";
pub const DEFAULT_OUTPUT_DIR: &str = "pics_out";
pub const DEFAULT_SIZE: &str = "1920x1080";
pub const DEFAULT_EXTENSIONS: &str = "jpg,jpeg,png,bmp,gif";
pub const DEFAULT_PREFIX: &str = "resized_";
pub const DEFAULT_QUALITY: u8 = 95;
pub const DEFAULT_JOBS: usize = 1;

#[derive(Parser, Debug)]
#[command(
    name = "headcrop",
    about = "Crop and resize a folder of photos to a fixed aspect ratio, keeping faces in frame",
    long_about = "
headcrop - face-aware batch reframing

Head framing needs a SeetaFace model file (e.g. seeta_fd_frontal_v1.0.bin)
passed with --face-model. Without it no faces are detected and every image is
center-cropped.

Every image in the input directory is cropped to the target aspect ratio and
resized to the exact target size. When faces are detected, the crop is centered
on the estimated head region (faces plus room for hair, chin and ears); when
none are found the image is center-cropped. Results are written to the output
directory with a filename prefix, in the same format as the source.

Example Usage:
  # Default run: pics_in -> pics_out at 1920x1080
  headcrop --face-model ./model/seeta_fd_frontal_v1.0.bin

  # Custom folders and size
  headcrop -i ~/Photos -o ~/Wallpapers -s 2560x1440 --face-model seeta.bin

  # Preview crop decisions and draw them for inspection
  headcrop --face-model seeta.bin --dry-run --verbose
  headcrop --face-model seeta.bin --debug

  # Settings from a JSON file, command line wins
  headcrop --config headcrop.json -j 4"
)]
pub struct Args {
    /// Directory containing the source images (created if missing)
    #[arg(short = 'i', long = "input", value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Output directory for processed images (created if missing)
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Target size (format: WIDTHxHEIGHT, e.g., 1920x1080)
    #[arg(short = 's', long = "size", default_value = DEFAULT_SIZE, value_name = "WIDTHxHEIGHT")]
    pub size: String,

    /// Comma-separated list of image extensions to process
    #[arg(long = "extensions", default_value = DEFAULT_EXTENSIONS)]
    pub extensions_str: String,

    /// Prefix added to each output filename
    #[arg(long = "prefix", default_value = DEFAULT_PREFIX, value_name = "PREFIX")]
    pub prefix: String,

    /// JPEG output quality (1-100)
    #[arg(short = 'q', long = "quality", default_value_t = DEFAULT_QUALITY, value_name = "QUALITY")]
    pub quality: u8,

    /// SeetaFace model file; required for face-aware cropping
    #[arg(long = "face-model", value_name = "FILE")]
    pub face_model: Option<PathBuf>,

    /// Smallest face size to detect, in pixels
    #[arg(long = "min-face-size", default_value_t = DetectionParams::default().min_face_size, value_name = "PIXELS")]
    pub min_face_size: u32,

    /// Detection score threshold (higher = fewer false positives)
    #[arg(long = "score-threshold", default_value_t = DetectionParams::default().score_threshold, value_name = "SCORE")]
    pub score_threshold: f64,

    /// Scale factor between image pyramid levels (0.0-1.0, exclusive)
    #[arg(long = "pyramid-scale", default_value_t = DetectionParams::default().pyramid_scale_factor, value_name = "FACTOR")]
    pub pyramid_scale: f32,

    /// Sliding window step in pixels
    #[arg(long = "window-step", default_value_t = DetectionParams::default().window_step, value_name = "PIXELS")]
    pub window_step: u32,

    /// Number of parallel processing jobs (1 = sequential, 0 = auto-detect CPU cores)
    #[arg(short = 'j', long = "jobs", default_value_t = DEFAULT_JOBS, value_name = "N")]
    pub jobs: usize,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Detect and plan crops without writing any file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write debug_<name> images showing faces, head region and crop
    #[arg(long = "debug")]
    pub debug: bool,

    /// Skip files whose output already exists
    #[arg(long = "skip-existing")]
    pub skip_existing: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long = "json-progress")]
    pub json_progress: bool,

    /// JSON configuration file; command-line arguments take precedence
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

impl Args {
    /// Parse the size string into width and height
    pub fn parse_size(&self) -> Result<(u32, u32), String> {
        let parts: Vec<&str> = self.size.split('x').collect();
        if parts.len() != 2 {
            return Err(format!(
                "Invalid size format '{}'. Use WIDTHxHEIGHT (e.g., 1920x1080)",
                self.size
            ));
        }

        let width = parts[0]
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("Invalid width: '{}'", parts[0]))?;
        let height = parts[1]
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("Invalid height: '{}'", parts[1]))?;

        if width == 0 || height == 0 {
            return Err("Width and height must be greater than 0".to_string());
        }

        if width > 16384 || height > 16384 {
            return Err("Width and height must be at most 16384 pixels".to_string());
        }

        Ok((width, height))
    }

    /// Parse the extensions string into a vector
    pub fn parse_extensions(&self) -> Vec<String> {
        self.extensions_str
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn target(&self) -> anyhow::Result<TargetSpec> {
        let (width, height) = self.parse_size().map_err(|e| anyhow::anyhow!(e))?;
        TargetSpec::new(width, height)
    }

    pub fn detection_params(&self) -> DetectionParams {
        DetectionParams {
            min_face_size: self.min_face_size,
            score_threshold: self.score_threshold,
            pyramid_scale_factor: self.pyramid_scale,
            window_step: self.window_step,
        }
    }

    pub fn parallel_jobs(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }

    /// Build the engine configuration from validated arguments
    pub fn processing_config(&self) -> anyhow::Result<ProcessingConfig> {
        Ok(ProcessingConfig {
            target: self.target()?,
            extensions: self.parse_extensions(),
            output_prefix: self.prefix.clone(),
            jpeg_quality: self.quality,
            parallel_jobs: self.parallel_jobs(),
            // JSON mode owns stdout
            verbose: self.verbose && !self.json_progress,
            dry_run: self.dry_run,
            debug: self.debug,
            skip_existing: self.skip_existing,
        })
    }
}


// Default implementation for tests
#[cfg(test)]
impl Default for Args {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            size: DEFAULT_SIZE.to_string(),
            extensions_str: DEFAULT_EXTENSIONS.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            quality: DEFAULT_QUALITY,
            face_model: None,
            min_face_size: DetectionParams::default().min_face_size,
            score_threshold: DetectionParams::default().score_threshold,
            pyramid_scale: DetectionParams::default().pyramid_scale_factor,
            window_step: DetectionParams::default().window_step,
            jobs: DEFAULT_JOBS,
            verbose: false,
            dry_run: false,
            debug: false,
            skip_existing: false,
            json_progress: false,
            config_file: None,
        }
    }
}
