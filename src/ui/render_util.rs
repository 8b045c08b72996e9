use super::{Arc, ImageBuffer, ImageFrame, RenderImage, Rgba, RgbaImage};

const CROP_OUTLINE_COLOR: [u8; 4] = [250, 204, 21, 255];

/// Converts a photo for display, outlining the square region the classifier sees.
pub(super) fn photo_to_image(photo: &RgbaImage) -> Option<Arc<RenderImage>> {
    let (width, height) = photo.dimensions();
    let mut rgba = photo.as_raw().clone();

    let side = width.min(height);
    if side > 0 {
        let x0 = (width - side) / 2;
        let y0 = (height - side) / 2;
        let thickness = (side / 120).max(2);
        draw_rect(&mut rgba, width, height, (x0, y0), side, thickness, CROP_OUTLINE_COLOR);
    }

    // GPUI expects BGRA.
    for px in rgba.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    let buffer = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, rgba)?;
    Some(Arc::new(RenderImage::new(vec![ImageFrame::new(buffer)])))
}

fn draw_rect(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    origin: (u32, u32),
    side: u32,
    thickness: u32,
    color: [u8; 4],
) {
    let (x0, y0) = origin;
    for offset in 0..side {
        for t in 0..thickness.min(side) {
            put_pixel_safe(buffer, width, height, x0 + offset, y0 + t, color);
            put_pixel_safe(buffer, width, height, x0 + offset, y0 + side - 1 - t, color);
            put_pixel_safe(buffer, width, height, x0 + t, y0 + offset, color);
            put_pixel_safe(buffer, width, height, x0 + side - 1 - t, y0 + offset, color);
        }
    }
}

fn put_pixel_safe(buffer: &mut [u8], width: u32, height: u32, x: u32, y: u32, color: [u8; 4]) {
    if x >= width || y >= height {
        return;
    }
    let idx = ((y * width + x) as usize) * 4;
    if let Some(pixel) = buffer.get_mut(idx..idx + 4) {
        pixel.copy_from_slice(&color);
    }
}
