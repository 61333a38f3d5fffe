use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::geometry::{FaceRect, Region};

const FACE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const HEAD_COLOR: Rgb<u8> = Rgb([255, 220, 0]);
const CROP_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draw the crop decision on top of the source image.
///
/// Faces are red, the padded head region yellow and the crop plan green.
/// Outlines are drawn a few pixels thick so they stay visible after viewers
/// downscale large photos.
pub fn draw_crop_decision(
    img: &RgbImage,
    faces: &[FaceRect],
    head_region: Option<&Region>,
    crop: &Region,
) -> RgbImage {
    let mut canvas = img.clone();
    let thickness = line_thickness(img.width(), img.height());

    for face in faces {
        if let Some(rect) = face_to_rect(face) {
            draw_thick_rect(&mut canvas, rect, thickness, FACE_COLOR);
        }
    }

    if let Some(rect) = head_region.and_then(region_to_rect) {
        draw_thick_rect(&mut canvas, rect, thickness, HEAD_COLOR);
    }

    if let Some(rect) = region_to_rect(crop) {
        draw_thick_rect(&mut canvas, rect, thickness, CROP_COLOR);
    }

    canvas
}

fn line_thickness(width: u32, height: u32) -> u32 {
    (width.max(height) / 500).max(1)
}

fn face_to_rect(face: &FaceRect) -> Option<Rect> {
    if face.width == 0 || face.height == 0 {
        return None;
    }
    Some(Rect::at(face.x, face.y).of_size(face.width, face.height))
}

fn region_to_rect(region: &Region) -> Option<Rect> {
    if region.width() == 0 || region.height() == 0 {
        return None;
    }
    Some(Rect::at(region.x_min as i32, region.y_min as i32).of_size(region.width(), region.height()))
}

fn draw_thick_rect(canvas: &mut RgbImage, rect: Rect, thickness: u32, color: Rgb<u8>) {
    for inset in 0..thickness {
        let width = rect.width().saturating_sub(inset * 2);
        let height = rect.height().saturating_sub(inset * 2);
        if width == 0 || height == 0 {
            break;
        }
        let inner = Rect::at(rect.left() + inset as i32, rect.top() + inset as i32).of_size(width, height);
        draw_hollow_rect_mut(canvas, inner, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    #[test]
    fn test_overlay_marks_crop_and_face_edges() {
        let img: RgbImage = ImageBuffer::from_pixel(200, 100, Rgb([0, 0, 0]));
        let faces = [FaceRect::new(90, 40, 20, 20)];
        let head = Region::new(80, 20, 120, 64);
        let crop = Region::new(11, 0, 188, 100);

        let overlay = draw_crop_decision(&img, &faces, Some(&head), &crop);

        assert_eq!(overlay.dimensions(), img.dimensions());
        assert_eq!(*overlay.get_pixel(11, 50), CROP_COLOR);
        assert_eq!(*overlay.get_pixel(90, 50), FACE_COLOR);
        assert_eq!(*overlay.get_pixel(80, 30), HEAD_COLOR);
        assert_eq!(*overlay.get_pixel(50, 50), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_overlay_skips_degenerate_shapes() {
        let img: RgbImage = ImageBuffer::from_pixel(50, 50, Rgb([10, 10, 10]));
        let faces = [FaceRect::new(10, 10, 0, 0)];
        let head = Region::new(10, 10, 10, 10);
        let crop = Region::new(0, 0, 50, 50);

        let overlay = draw_crop_decision(&img, &faces, Some(&head), &crop);
        assert_eq!(*overlay.get_pixel(10, 10), Rgb([10, 10, 10]));
    }
}
