use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::Path;
use std::time::Instant;

use headcrop::cli::Args;
use headcrop::image_processing::batch::{calculate_final_stats, ProcessingStats};
use headcrop::image_processing::{create_detector, FileOutcome, ProcessingEngine, ProcessingResult};
use headcrop::json_output::JsonMessage;
use headcrop::utils::{
    create_progress_bar, error_println, format_duration, prepare_directories, validate_inputs,
    warn_println,
};

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut args = Args::parse();
    args.load_and_merge_config()?;

    let json_mode = args.json_progress;

    // Print banner
    if !json_mode {
        println!("{}", style("headcrop - Face-Aware Photo Reframing").bold().blue());
        println!("{}", style("Crop to aspect ratio, keep the heads").dim());
        println!();
    }

    validate_inputs(&args)?;

    let config = args.processing_config()?;
    let detection_params = args.detection_params();

    if config.verbose {
        println!("{}", style("Configuration:").bold());
        println!("  Input directory: {}", args.input_dir.display());
        println!("  Output directory: {}", args.output_dir.display());
        println!(
            "  Target size: {}x{}",
            config.target.width(),
            config.target.height()
        );
        println!("  Extensions: {:?}", config.extensions);
        println!("  Output prefix: {}", config.output_prefix);
        println!("  JPEG quality: {}", config.jpeg_quality);
        println!("  Parallel jobs: {}", config.parallel_jobs);
        match &args.face_model {
            Some(model) => {
                println!("  Face model: {}", model.display());
                println!(
                    "    min face size {}px, score threshold {}, pyramid scale {}, window step {}",
                    detection_params.min_face_size,
                    detection_params.score_threshold,
                    detection_params.pyramid_scale_factor,
                    detection_params.window_step
                );
            }
            None => println!("  Face model: none"),
        }
        if config.debug {
            println!("  Debug mode: enabled - will write debug_ overlays");
        }
        if config.skip_existing {
            println!("  Skip existing outputs: enabled");
        }
        if config.dry_run {
            println!("  Dry run mode: enabled (simulation only - no files will be created)");
        }
        println!();
    }

    prepare_directories(&args.input_dir, &args.output_dir, config.dry_run)?;

    let detector = create_detector(args.face_model.as_deref(), &detection_params)?;
    if args.face_model.is_none() && !json_mode {
        warn_println("No --face-model given: faces will not be detected, every image is center-cropped");
    }

    let dry_run_mode = config.dry_run;
    let engine = ProcessingEngine::new(config, detector)?;

    let image_files = engine.discover_images(&args.input_dir)?;
    if image_files.is_empty() {
        if json_mode {
            JsonMessage::no_input(&args.input_dir).emit();
        } else {
            println!(
                "{}",
                style(format!(
                    "No image files found in '{}' directory!",
                    args.input_dir.display()
                ))
                .yellow()
            );
        }
        return Ok(());
    }

    if !json_mode {
        println!(
            "Found {} images, detector: {}",
            style(image_files.len()).bold(),
            style(engine.detector_name()).cyan()
        );
    }

    let total = image_files.len();
    let progress = if json_mode {
        None
    } else {
        let pb = create_progress_bar(total as u64)?;
        pb.set_message("Processing images");
        Some(pb)
    };

    let results = engine.process_batch(&image_files, &args.output_dir, |count, path, result| {
        let name = file_label(path);
        if json_mode {
            match result {
                Ok(processed) => JsonMessage::completed(processed).emit(),
                Err(e) => JsonMessage::failed(path, e).emit(),
            }
            JsonMessage::progress(count, total, name);
        } else if let Some(pb) = &progress {
            if let Err(e) = result {
                pb.suspend(|| error_println(&format!("{}: {:#}", name, e)));
            }
            pb.set_message(name);
            pb.inc(1);
        }
    });

    let stats = calculate_final_stats(&results, start_time.elapsed());

    if json_mode {
        JsonMessage::summary(&stats).emit();
        return Ok(());
    }

    if let Some(pb) = &progress {
        pb.finish_with_message("Processing complete!");
    }
    println!();

    print_summary(&results, &image_files, &stats, &args.output_dir, dry_run_mode);

    Ok(())
}

fn print_summary(
    results: &[Result<ProcessingResult>],
    image_files: &[std::path::PathBuf],
    stats: &ProcessingStats,
    output_dir: &Path,
    dry_run_mode: bool,
) {
    let header = if dry_run_mode {
        style("Dry Run Results Summary:").bold().cyan()
    } else {
        style("Results Summary:").bold().green()
    };
    println!("{}", header);

    let processed_label = if dry_run_mode {
        "Would be processed"
    } else {
        "Successfully processed"
    };
    println!("  {}: {}", processed_label, style(stats.successful).bold().green());

    if stats.failed > 0 {
        println!("  Failed: {}", style(stats.failed).bold().red());
    }
    if stats.skipped > 0 {
        println!(
            "  Skipped (already exist): {}",
            style(stats.skipped).bold().yellow()
        );
    }

    if stats.successful > 0 {
        println!();
        println!("{}", style("Face Detection Results:").bold().cyan());
        println!(
            "  Images framed on faces: {}",
            style(stats.with_faces).bold().green()
        );
        println!(
            "  Center-cropped (no faces): {}",
            style(stats.center_cropped).bold().yellow()
        );
        if stats.with_faces > 0 {
            println!(
                "  Total faces found: {} ({:.1} per framed image)",
                style(stats.total_faces).bold().cyan(),
                stats.total_faces as f64 / stats.with_faces as f64
            );
        }
    }

    if dry_run_mode && stats.successful > 0 {
        println!();
        println!("{}", style("Planned Crops:").bold().blue());
        for result in results.iter().flatten() {
            if let FileOutcome::Planned(decision) = &result.outcome {
                let (width, height) = decision.source_size;
                let faces = match decision.face_count() {
                    0 => style("no faces, center crop".to_string()).dim(),
                    1 => style("1 face".to_string()).green(),
                    n => style(format!("{} faces", n)).green(),
                };
                println!(
                    "  {} ({}x{}) - {} - crop ({},{})-({},{}) -> {}",
                    style(file_label(&result.input_path)).bold(),
                    width,
                    height,
                    faces,
                    decision.crop.x_min,
                    decision.crop.y_min,
                    decision.crop.x_max,
                    decision.crop.y_max,
                    style(file_label(&result.output_path)).cyan()
                );
            }
        }
    }

    if stats.failed > 0 {
        println!();
        println!("{}", style("Failed Files:").bold().red());
        for (path, result) in image_files.iter().zip(results) {
            if let Err(e) = result {
                println!("  {}: {:#}", style(file_label(path)).bold(), e);
            }
        }
    }

    println!();
    println!("{}", style("Performance:").bold().blue());
    println!(
        "  Total processing time: {}",
        style(format_duration(stats.total_duration)).bold()
    );
    println!(
        "  Average time per image: {}",
        style(format_duration(stats.average_duration())).dim()
    );
    println!();

    if dry_run_mode {
        println!("{}", style("Dry Run Mode:").bold().yellow());
        println!("  No files were created during this simulation");
        println!("  Would be saved to: {}", output_dir.display());
        println!("  Remove --dry-run to actually process the images");
    } else {
        println!("{}", style("Output files:").bold().green());
        println!("  All files: {}", output_dir.display());
    }
}
