use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::cli::Args;

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
        )?
        .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Validate command line arguments
pub fn validate_inputs(args: &Args) -> Result<()> {
    args.parse_size().map_err(|e| anyhow::anyhow!(e))?;

    if args.parse_extensions().is_empty() {
        return Err(anyhow::anyhow!("No valid extensions specified"));
    }

    if args.quality == 0 || args.quality > 100 {
        return Err(anyhow::anyhow!(
            "JPEG quality must be between 1 and 100, got: {}",
            args.quality
        ));
    }

    if args.jobs > 64 {
        return Err(anyhow::anyhow!(
            "Job count too high (max 64), got: {}",
            args.jobs
        ));
    }

    if args.prefix.is_empty() || args.prefix.contains(['/', '\\']) {
        return Err(anyhow::anyhow!(
            "Output prefix must be non-empty and must not contain path separators: '{}'",
            args.prefix
        ));
    }

    if !(args.pyramid_scale > 0.0 && args.pyramid_scale < 1.0) {
        return Err(anyhow::anyhow!(
            "Pyramid scale factor must be between 0 and 1 (exclusive), got: {}",
            args.pyramid_scale
        ));
    }

    if args.window_step == 0 {
        return Err(anyhow::anyhow!("Sliding window step must be greater than 0"));
    }

    if let Some(model) = &args.face_model {
        if !model.is_file() {
            return Err(anyhow::anyhow!(
                "Face model not found: {}",
                model.display()
            ));
        }

        #[cfg(not(feature = "face-detection"))]
        {
            return Err(anyhow::anyhow!(
                "Face detection is not available. \
                 Rebuild with --features face-detection to use --face-model"
            ));
        }
    }

    Ok(())
}

/// Create the input and output directories when missing.
///
/// The output directory is left alone in dry-run mode.
pub fn prepare_directories(input_dir: &Path, output_dir: &Path, dry_run: bool) -> Result<()> {
    std::fs::create_dir_all(input_dir).with_context(|| {
        format!("Failed to create input directory: {}", input_dir.display())
    })?;

    if !input_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Input path is not a directory: {}",
            input_dir.display()
        ));
    }

    if !dry_run {
        std::fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;
    }

    Ok(())
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    if let Some(ext) = get_file_extension(path) {
        extensions.contains(&ext)
    } else {
        false
    }
}

/// Output file name: `{prefix}{original file name}`
pub fn create_output_filename(input_path: &Path, prefix: &str) -> Result<String> {
    let file_name = input_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", input_path.display()))?;

    Ok(format!("{}{}", prefix, file_name))
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn test_has_valid_extension() {
        let extensions = vec!["jpg".to_string(), "png".to_string()];
        assert!(has_valid_extension(Path::new("a.jpg"), &extensions));
        assert!(has_valid_extension(Path::new("dir/B.PNG"), &extensions));
        assert!(!has_valid_extension(Path::new("a.gif"), &extensions));
        assert!(!has_valid_extension(Path::new("README"), &extensions));
    }

    #[test]
    fn test_create_output_filename() {
        assert_eq!(
            create_output_filename(Path::new("pics_in/holiday.JPG"), "resized_").unwrap(),
            "resized_holiday.JPG"
        );
        assert!(create_output_filename(Path::new("/"), "resized_").is_err());
    }

    #[test]
    fn test_validate_inputs() {
        assert!(validate_inputs(&Args::default()).is_ok());

        let args = Args {
            quality: 0,
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());

        let args = Args {
            size: "1920x0".to_string(),
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());

        let args = Args {
            prefix: "out/".to_string(),
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());

        let args = Args {
            face_model: Some(PathBuf::from("/nonexistent/seeta.bin")),
            ..Default::default()
        };
        assert!(validate_inputs(&args).is_err());
    }

    #[test]
    fn test_prepare_directories_creates_both() {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("pics_in");
        let output = root.path().join("pics_out");

        prepare_directories(&input, &output, false).unwrap();
        assert!(input.is_dir());
        assert!(output.is_dir());
    }

    #[test]
    fn test_prepare_directories_dry_run_skips_output() {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("pics_in");
        let output = root.path().join("pics_out");

        prepare_directories(&input, &output, true).unwrap();
        assert!(input.is_dir());
        assert!(!output.exists());
    }

    #[test]
    fn test_prepare_directories_rejects_file_as_input() {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("not_a_dir");
        std::fs::write(&input, b"x").unwrap();

        assert!(prepare_directories(&input, &root.path().join("out"), false).is_err());
    }
}
