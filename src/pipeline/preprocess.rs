use std::path::Path;

use fast_image_resize as fir;
use image::RgbaImage;
use ndarray::Array4;
use rayon::prelude::*;
use thiserror::Error;

use crate::types::Photo;

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("failed to decode photo: {0}")]
    Decode(#[from] image::ImageError),
    #[error("resize failed: {0}")]
    Resize(String),
    #[error("failed to build input tensor: {0}")]
    Tensor(String),
}

/// Per-channel normalization applied after scaling a pixel to `v / 255`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalizationPolicy {
    Plain,
    /// `(v/255 - mean[c]) / std[c]` with the ImageNet RGB statistics.
    ImageNet,
}

impl NormalizationPolicy {
    #[inline]
    pub fn normalize(self, value: u8, channel: usize) -> f32 {
        let scaled = value as f32 / 255.0;
        match self {
            NormalizationPolicy::Plain => scaled,
            NormalizationPolicy::ImageNet => {
                (scaled - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel]
            }
        }
    }
}

/// Decodes a photo file into a [`Photo`].
pub fn load_photo(path: &Path) -> Result<Photo, PreprocessError> {
    Ok(Photo::new(image::open(path)?.to_rgba8()))
}

/// Centre crop to a `min(width, height)` square.
pub fn square_crop(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width == height {
        return image.clone();
    }
    let side = width.min(height);
    let x = (width - side) / 2;
    let y = (height - side) / 2;
    image::imageops::crop_imm(image, x, y, side, side).to_image()
}

/// Resizes `image` to `size x size` (aspect ratio is not preserved) and lays it
/// out as an NHWC `[1, size, size, 3]` tensor. The input is left untouched.
pub fn preprocess(
    image: &RgbaImage,
    size: u32,
    policy: NormalizationPolicy,
) -> Result<Array4<f32>, PreprocessError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || size == 0 {
        return Err(PreprocessError::EmptyImage { width, height });
    }

    let resized = if width == size && height == size {
        image.as_raw().clone()
    } else {
        let src_image =
            fir::images::Image::from_vec_u8(width, height, image.as_raw().clone(), fir::PixelType::U8x4)
                .map_err(|err| PreprocessError::Resize(err.to_string()))?;
        let mut dst_image = fir::images::Image::new(size, size, fir::PixelType::U8x4);
        let mut resizer = fir::Resizer::new();
        let resize_options = fir::ResizeOptions::new()
            .resize_alg(fir::ResizeAlg::Interpolation(fir::FilterType::Bilinear));
        resizer
            .resize(&src_image, &mut dst_image, Some(&resize_options))
            .map_err(|err| PreprocessError::Resize(err.to_string()))?;
        dst_image.into_vec()
    };

    let normalized: Vec<f32> = resized
        .par_chunks_exact(4)
        .flat_map_iter(|px| {
            [
                policy.normalize(px[0], 0),
                policy.normalize(px[1], 1),
                policy.normalize(px[2], 2),
            ]
        })
        .collect();

    Array4::<f32>::from_shape_vec((1, size as usize, size as usize, 3), normalized)
        .map_err(|err| PreprocessError::Tensor(err.to_string()))
}
