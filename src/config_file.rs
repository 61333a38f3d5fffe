use crate::cli::{
    Args, DEFAULT_EXTENSIONS, DEFAULT_INPUT_DIR, DEFAULT_JOBS, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX,
    DEFAULT_QUALITY, DEFAULT_SIZE,
};
use crate::image_processing::DetectionParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file accepted by `--config`
///
/// ```json
/// { "inputPath": "photos", "size": "2560x1440", "faceModel": "seeta.bin", "jobs": 4 }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub input_path: Option<String>,
    pub output_path: Option<String>,
    pub size: Option<String>,
    pub extensions: Option<String>,
    pub prefix: Option<String>,
    pub quality: Option<u8>,
    pub face_model: Option<String>,
    pub min_face_size: Option<u32>,
    pub score_threshold: Option<f64>,
    pub pyramid_scale: Option<f32>,
    pub window_step: Option<u32>,
    pub jobs: Option<usize>,
    pub verbose: Option<bool>,
    pub dry_run: Option<bool>,
    pub debug: Option<bool>,
    pub skip_existing: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments
    /// Command-line arguments take precedence over config file values
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ConfigFile::load(&config_path)?;
            self.merge_from_config(config);

            if self.verbose && !self.json_progress {
                eprintln!("Loaded configuration from: {}", config_path.display());
            }
        }
        Ok(())
    }

    /// Apply config values wherever the argument still holds its default
    pub fn merge_from_config(&mut self, config: ConfigFile) {
        let defaults = DetectionParams::default();

        if self.input_dir == Path::new(DEFAULT_INPUT_DIR) {
            if let Some(input) = config.input_path {
                self.input_dir = PathBuf::from(input);
            }
        }

        if self.output_dir == Path::new(DEFAULT_OUTPUT_DIR) {
            if let Some(output) = config.output_path {
                self.output_dir = PathBuf::from(output);
            }
        }

        if self.size == DEFAULT_SIZE {
            if let Some(size) = config.size {
                self.size = size;
            }
        }

        if self.extensions_str == DEFAULT_EXTENSIONS {
            if let Some(ext) = config.extensions {
                self.extensions_str = ext;
            }
        }

        if self.prefix == DEFAULT_PREFIX {
            if let Some(prefix) = config.prefix {
                self.prefix = prefix;
            }
        }

        if self.quality == DEFAULT_QUALITY {
            if let Some(quality) = config.quality {
                self.quality = quality;
            }
        }

        if self.face_model.is_none() {
            self.face_model = config.face_model.map(PathBuf::from);
        }

        // Detection parameters
        if self.min_face_size == defaults.min_face_size {
            if let Some(size) = config.min_face_size {
                self.min_face_size = size;
            }
        }

        if self.score_threshold == defaults.score_threshold {
            if let Some(threshold) = config.score_threshold {
                self.score_threshold = threshold;
            }
        }

        if self.pyramid_scale == defaults.pyramid_scale_factor {
            if let Some(scale) = config.pyramid_scale {
                self.pyramid_scale = scale;
            }
        }

        if self.window_step == defaults.window_step {
            if let Some(step) = config.window_step {
                self.window_step = step;
            }
        }

        if self.jobs == DEFAULT_JOBS {
            if let Some(jobs) = config.jobs {
                self.jobs = jobs;
            }
        }

        // Boolean flags - only apply if currently false (default)
        if !self.verbose {
            self.verbose = config.verbose.unwrap_or(false);
        }

        if !self.dry_run {
            self.dry_run = config.dry_run.unwrap_or(false);
        }

        if !self.debug {
            self.debug = config.debug.unwrap_or(false);
        }

        if !self.skip_existing {
            self.skip_existing = config.skip_existing.unwrap_or(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_fills_defaults() {
        let config: ConfigFile = serde_json::from_str(
            r#"{
                "inputPath": "photos",
                "size": "2560x1440",
                "faceModel": "model/seeta.bin",
                "minFaceSize": 40,
                "jobs": 4,
                "debug": true
            }"#,
        )
        .unwrap();

        let mut args = Args::default();
        args.merge_from_config(config);

        assert_eq!(args.input_dir, PathBuf::from("photos"));
        assert_eq!(args.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(args.size, "2560x1440");
        assert_eq!(args.face_model, Some(PathBuf::from("model/seeta.bin")));
        assert_eq!(args.min_face_size, 40);
        assert_eq!(args.jobs, 4);
        assert!(args.debug);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_command_line_wins() {
        let mut args =
            Args::try_parse_from(["headcrop", "-s", "800x600", "--prefix", "cli_", "-j", "2"])
                .unwrap();

        args.merge_from_config(ConfigFile {
            size: Some("2560x1440".to_string()),
            prefix: Some("cfg_".to_string()),
            jobs: Some(8),
            ..Default::default()
        });

        assert_eq!(args.size, "800x600");
        assert_eq!(args.prefix, "cli_");
        assert_eq!(args.jobs, 2);
    }

    #[test]
    fn test_load_and_merge_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headcrop.json");
        fs::write(&path, r#"{ "outputPath": "wallpapers", "quality": 80 }"#).unwrap();

        let mut args = Args {
            config_file: Some(path),
            ..Default::default()
        };
        args.load_and_merge_config().unwrap();

        assert_eq!(args.output_dir, PathBuf::from("wallpapers"));
        assert_eq!(args.quality, 80);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{ "outputPath": 12 "#).unwrap();

        let mut args = Args {
            config_file: Some(path),
            ..Default::default()
        };
        assert!(args.load_and_merge_config().is_err());

        let mut args = Args {
            config_file: Some(dir.path().join("missing.json")),
            ..Default::default()
        };
        assert!(args.load_and_merge_config().is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let parsed: std::result::Result<ConfigFile, _> =
            serde_json::from_str(r#"{ "outputFolder": "elsewhere" }"#);
        assert!(parsed.is_err());
    }
}
