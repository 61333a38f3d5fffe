use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Resolve the container format from the file extension.
///
/// Output keeps the extension of the input, so this also decides the output codec.
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("Unsupported image format: {}", path.display()))?;

    match format {
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Gif => Ok(format),
        other => Err(anyhow::anyhow!(
            "Unsupported output format {:?} for {}",
            other,
            path.display()
        )),
    }
}

/// Encode an image in the container format implied by `path`.
///
/// JPEG output uses the given quality; the other formats are lossless and
/// ignore it.
pub fn save_image(img: &RgbImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    let format = output_format(path)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        ImageFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut writer, jpeg_quality)
                .encode_image(img)
                .with_context(|| format!("Failed to encode JPEG: {}", path.display()))?;
        }
        ImageFormat::Gif => {
            // GIF frames are RGBA
            DynamicImage::ImageRgb8(img.clone())
                .to_rgba8()
                .write_to(&mut writer, format)
                .with_context(|| format!("Failed to encode GIF: {}", path.display()))?;
        }
        _ => {
            img.write_to(&mut writer, format)
                .with_context(|| format!("Failed to encode image: {}", path.display()))?;
        }
    }

    // Buffered bytes only hit the disk here
    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}
