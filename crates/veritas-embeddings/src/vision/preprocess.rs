//! CLIP image preprocessing: shortest-side resize, center crop, normalize, NCHW.

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Per-channel mean of the CLIP training set.
pub const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
/// Per-channel standard deviation of the CLIP training set.
pub const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Resize so the shorter side equals `side`, then crop the center square.
pub fn resize_and_crop(img: &DynamicImage, side: u32) -> RgbImage {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let scale = side as f32 / w.min(h).max(1) as f32;
    let new_w = ((w as f32 * scale).round() as u32).max(side);
    let new_h = ((h as f32 * scale).round() as u32).max(side);

    let resized = image::imageops::resize(&rgb, new_w, new_h, FilterType::CatmullRom);
    let x = (new_w - side) / 2;
    let y = (new_h - side) / 2;
    image::imageops::crop_imm(&resized, x, y, side, side).to_image()
}

/// Planar `[3, side, side]` buffer, scaled to [0, 1] then standardized.
pub fn to_nchw(rgb: &RgbImage) -> Vec<f32> {
    let (w, h) = rgb.dimensions();
    let mut tensor = Vec::with_capacity(3 * (w * h) as usize);
    for c in 0..3 {
        for y in 0..h {
            for x in 0..w {
                let pixel = rgb.get_pixel(x, y);
                tensor.push((pixel[c] as f32 / 255.0 - CLIP_MEAN[c]) / CLIP_STD[c]);
            }
        }
    }
    tensor
}

/// Full pipeline from a decoded image to encoder input.
pub fn preprocess(img: &DynamicImage, side: usize) -> Vec<f32> {
    to_nchw(&resize_and_crop(img, side as u32))
}

/// Divide by the Euclidean norm; near-zero vectors come back unchanged.
pub fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn wide_image_is_cropped_to_square() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 100, Rgb([10, 20, 30])));
        let out = resize_and_crop(&img, 32);
        assert_eq!(out.dimensions(), (32, 32));
    }

    #[test]
    fn nchw_layout_and_normalization() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 128]));
        let t = to_nchw(&img);
        assert_eq!(t.len(), 12);
        let red = (1.0 - CLIP_MEAN[0]) / CLIP_STD[0];
        let green = (0.0 - CLIP_MEAN[1]) / CLIP_STD[1];
        assert!(t[..4].iter().all(|v| (v - red).abs() < 1e-6));
        assert!(t[4..8].iter().all(|v| (v - green).abs() < 1e-6));
    }

    #[test]
    fn l2_normalize_unit_length_and_zero_guard() {
        let v = l2_normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6 && (v[1] - 0.8).abs() < 1e-6);
        assert_eq!(l2_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }
}
