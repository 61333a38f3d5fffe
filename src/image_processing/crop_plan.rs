use super::geometry::{Region, TargetSpec};

/// Compute the largest crop with the target aspect ratio that fits the image.
///
/// One source dimension is kept whole and the other is shrunk (floored) to hit
/// the ratio. Ratios are compared by cross-multiplication so images that
/// already match the target keep every pixel.
pub fn crop_dimensions(image_width: u32, image_height: u32, target: TargetSpec) -> (u32, u32) {
    let (iw, ih) = (image_width as u64, image_height as u64);
    let (tw, th) = (target.width() as u64, target.height() as u64);

    if iw * th > ih * tw {
        // Source is wider - keep the full height
        let crop_width = (ih * tw / th).clamp(1, iw) as u32;
        (crop_width, image_height)
    } else {
        // Source is taller or equal - keep the full width
        let crop_height = (iw * th / tw).clamp(1, ih) as u32;
        (image_width, crop_height)
    }
}

/// Plan the crop rectangle for one image.
///
/// With a head region the crop is centered on it and then slid back inside the
/// image when the head sits near an edge. A head region larger than the crop is
/// only partially kept. Without one the crop is centered on the image.
///
/// Image dimensions must be non-zero; the orchestrator rejects empty images
/// before planning.
pub fn plan(
    image_width: u32,
    image_height: u32,
    target: TargetSpec,
    head_region: Option<&Region>,
) -> Region {
    let (crop_width, crop_height) = crop_dimensions(image_width, image_height, target);

    let (x1, y1) = match head_region {
        Some(head) => head_centered_offset(
            image_width,
            image_height,
            crop_width,
            crop_height,
            head,
        ),
        None => center_offset(image_width, image_height, crop_width, crop_height),
    };

    Region::new(x1, y1, x1 + crop_width, y1 + crop_height)
}

fn head_centered_offset(
    image_width: u32,
    image_height: u32,
    crop_width: u32,
    crop_height: u32,
    head: &Region,
) -> (u32, u32) {
    let (center_x, center_y) = head.center();

    let ideal_x = center_x as i64 - (crop_width / 2) as i64;
    let ideal_y = center_y as i64 - (crop_height / 2) as i64;

    let x = ideal_x.clamp(0, (image_width - crop_width) as i64) as u32;
    let y = ideal_y.clamp(0, (image_height - crop_height) as i64) as u32;
    (x, y)
}

fn center_offset(image_width: u32, image_height: u32, crop_width: u32, crop_height: u32) -> (u32, u32) {
    (
        (image_width - crop_width) / 2,
        (image_height - crop_height) / 2,
    )
}
