use anyhow::Result;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{imageops, RgbImage};

use super::geometry::{Region, TargetSpec};

/// Cut the planned region out of the image and scale it to the exact target size.
pub fn crop_and_resize(img: &RgbImage, plan: &Region, target: TargetSpec) -> Result<RgbImage> {
    let cropped = crop_image(img, plan)?;
    resize_image(&cropped, target.width(), target.height())
}

/// Crop an image to the given region
pub fn crop_image(img: &RgbImage, region: &Region) -> Result<RgbImage> {
    let (img_width, img_height) = img.dimensions();

    if region.x_max > img_width || region.y_max > img_height {
        return Err(anyhow::anyhow!(
            "Crop region exceeds image bounds: crop({},{})-({},{}) on {}x{} image",
            region.x_min,
            region.y_min,
            region.x_max,
            region.y_max,
            img_width,
            img_height
        ));
    }

    if region.width() == 0 || region.height() == 0 {
        return Err(anyhow::anyhow!(
            "Crop region is empty: {}x{}",
            region.width(),
            region.height()
        ));
    }

    Ok(imageops::crop_imm(img, region.x_min, region.y_min, region.width(), region.height()).to_image())
}

/// Resize an image to exact dimensions using Lanczos3 convolution
pub fn resize_image(img: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    let (src_width, src_height) = img.dimensions();

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }

    if src_width == 0 || src_height == 0 {
        return Err(anyhow::anyhow!("Source image has zero dimensions"));
    }
    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!("Target dimensions must be greater than 0"));
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x3)?;
    let mut dst_image = Image::new(width, height, PixelType::U8x3);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, &options)?;

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| anyhow::anyhow!("Resized buffer does not match {}x{}", width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_test_image(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_crop_image() {
        let img = create_test_image(100, 100);
        let cropped = crop_image(&img, &Region::new(10, 10, 60, 60)).unwrap();

        assert_eq!(cropped.dimensions(), (50, 50));

        // 15-10, 15-10
        assert_eq!(img.get_pixel(15, 15), cropped.get_pixel(5, 5));
    }

    #[test]
    fn test_crop_bounds_validation() {
        let img = create_test_image(50, 50);

        assert!(crop_image(&img, &Region::new(10, 10, 60, 60)).is_err());
        assert!(crop_image(&img, &Region::new(10, 10, 10, 40)).is_err());
        assert!(crop_image(&img, &Region::new(10, 10, 50, 50)).is_ok());
    }

    #[test]
    fn test_resize_image() {
        let img = create_test_image(100, 100);
        let resized = resize_image(&img, 50, 50).unwrap();
        assert_eq!(resized.dimensions(), (50, 50));

        let upscaled = resize_image(&img, 300, 120).unwrap();
        assert_eq!(upscaled.dimensions(), (300, 120));
    }

    #[test]
    fn test_resize_preserves_flat_color() {
        let img: RgbImage = ImageBuffer::from_pixel(40, 30, Rgb([90, 120, 200]));
        let resized = resize_image(&img, 16, 9).unwrap();
        for pixel in resized.pixels() {
            for (channel, expected) in pixel.0.iter().zip([90u8, 120, 200]) {
                assert!(channel.abs_diff(expected) <= 1);
            }
        }
    }

    #[test]
    fn test_crop_and_resize_to_target() {
        let img = create_test_image(400, 200);
        let target = TargetSpec::new(160, 90).unwrap();
        let plan = crate::image_processing::crop_plan::plan(400, 200, target, None);

        let output = crop_and_resize(&img, &plan, target).unwrap();
        assert_eq!(output.dimensions(), (160, 90));
    }
}
