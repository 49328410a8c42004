//! Frame-to-model-input cropping

use crate::error::VisionError;
use crate::frame::Frame;
use drishti_core::TransformPair;
use image::RgbImage;

/// Copy a frame into a square model-input buffer through the forward
/// map of `transform`. Destination-driven: each crop pixel is mapped
/// back into the frame through the inverse and sampled nearest-
/// neighbour; pixels that fall outside the frame stay black.
pub fn crop_frame(
    frame: &Frame,
    transform: &TransformPair,
    dst_size: u32,
) -> Result<RgbImage, VisionError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(VisionError::Capture("Cannot crop an empty frame".to_string()));
    }
    if dst_size == 0 {
        return Err(VisionError::Processing(
            "Model input size must be non-zero".to_string(),
        ));
    }

    let mut crop = RgbImage::new(dst_size, dst_size);
    for dst_y in 0..dst_size {
        for dst_x in 0..dst_size {
            // Sample at the pixel center
            let (src_x, src_y) = transform
                .inverse
                .map_point(dst_x as f32 + 0.5, dst_y as f32 + 0.5);

            if src_x < 0.0 || src_y < 0.0 {
                continue;
            }
            let (src_x, src_y) = (src_x as u32, src_y as u32);
            if let Some([r, g, b]) = frame.pixel(src_x, src_y) {
                crop.put_pixel(dst_x, dst_y, image::Rgb([r, g, b]));
            }
        }
    }

    Ok(crop)
}
