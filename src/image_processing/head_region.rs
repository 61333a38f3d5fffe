use super::geometry::{FaceRect, Region};

/// Share of the face height added above the faces (hair, forehead)
const TOP_PADDING: f64 = 1.0;
/// Share of the face height added below the faces (chin)
const BOTTOM_PADDING: f64 = 0.2;
/// Share of the face width added on each side (ears, hair)
const SIDE_PADDING: f64 = 0.5;

/// Estimate the region covering every detected head.
///
/// Takes the union of all face boxes and pads it asymmetrically: a full face
/// height on top, a fifth of it below, and half the union width on either side.
/// The result is clamped to the image. Returns `None` when no faces were found.
pub fn estimate(faces: &[FaceRect], image_width: u32, image_height: u32) -> Option<Region> {
    let first = faces.first()?;

    let (mut x_min, mut y_min, mut x_max, mut y_max) =
        (first.x as i64, first.y as i64, first.right(), first.bottom());

    for face in &faces[1..] {
        x_min = x_min.min(face.x as i64);
        y_min = y_min.min(face.y as i64);
        x_max = x_max.max(face.right());
        y_max = y_max.max(face.bottom());
    }

    let face_width = x_max - x_min;
    let face_height = y_max - y_min;

    let padding_top = (face_height as f64 * TOP_PADDING) as i64;
    let padding_bottom = (face_height as f64 * BOTTOM_PADDING) as i64;
    let padding_sides = (face_width as f64 * SIDE_PADDING) as i64;

    let clamp_x = |v: i64| v.clamp(0, image_width as i64) as u32;
    let clamp_y = |v: i64| v.clamp(0, image_height as i64) as u32;

    Some(Region::new(
        clamp_x(x_min - padding_sides),
        clamp_y(y_min - padding_top),
        clamp_x(x_max + padding_sides),
        clamp_y(y_max + padding_bottom),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encloses(outer: &Region, inner: &Region) -> bool {
        outer.x_min <= inner.x_min
            && outer.y_min <= inner.y_min
            && outer.x_max >= inner.x_max
            && outer.y_max >= inner.y_max
    }

    #[test]
    fn test_no_faces_yields_none() {
        assert_eq!(estimate(&[], 4000, 2000), None);
    }

    #[test]
    fn test_single_face_padding() {
        let faces = [FaceRect::new(1900, 900, 200, 200)];
        let region = estimate(&faces, 4000, 2000).unwrap();

        // top +200, bottom +40, sides +100
        assert_eq!(region, Region::new(1800, 700, 2200, 1140));
        assert_eq!(region.center(), (2000, 920));
    }

    #[test]
    fn test_union_of_multiple_faces() {
        let faces = [
            FaceRect::new(100, 400, 100, 100),
            FaceRect::new(700, 300, 100, 150),
        ];
        let region = estimate(&faces, 2000, 2000).unwrap();

        // union (100,300)-(800,500): width 700, height 200
        // sides +350 runs past the left edge, top +200, bottom +40
        assert_eq!(region, Region::new(0, 100, 1150, 540));
    }

    #[test]
    fn test_region_contains_raw_union_and_is_clamped() {
        let cases = [
            (vec![FaceRect::new(10, 10, 50, 50)], 100, 100),
            (vec![FaceRect::new(0, 0, 30, 40)], 640, 480),
            (vec![FaceRect::new(600, 400, 40, 80)], 640, 480),
            (
                vec![FaceRect::new(5, 300, 60, 60), FaceRect::new(500, 20, 90, 90)],
                640,
                480,
            ),
        ];

        for (faces, width, height) in cases {
            let region = estimate(&faces, width, height).unwrap();
            for face in &faces {
                let raw = Region::new(
                    face.x as u32,
                    face.y as u32,
                    (face.right() as u32).min(width),
                    (face.bottom() as u32).min(height),
                );
                assert!(encloses(&region, &raw), "{:?} should contain {:?}", region, raw);
            }
            assert!(region.x_max <= width);
            assert!(region.y_max <= height);
        }
    }

    #[test]
    fn test_negative_face_origin_is_clamped() {
        let faces = [FaceRect::new(-20, -10, 100, 100)];
        let region = estimate(&faces, 300, 300).unwrap();

        assert_eq!(region.x_min, 0);
        assert_eq!(region.y_min, 0);
        assert_eq!(region.x_max, 130);
        assert_eq!(region.y_max, 110);
    }

    #[test]
    fn test_zero_size_face_is_degenerate() {
        let faces = [FaceRect::new(50, 60, 0, 0)];
        let region = estimate(&faces, 100, 100).unwrap();

        assert_eq!(region, Region::new(50, 60, 50, 60));
        assert_eq!(region.width(), 0);
        assert_eq!(region.height(), 0);
    }
}
