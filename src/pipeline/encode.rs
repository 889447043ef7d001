//! Image encoding: file on disk → downscaled JPEG → base64 `ImageData`.
//!
//! VLM APIs accept images as base64 data-URIs embedded in the JSON request
//! body. Scans and photos are routinely 4000+ px on the long edge, far more
//! than a vision model can use, so the image is first bounded to
//! `max_edge` pixels on its longest side, flattened to RGB and re-encoded as
//! JPEG at a fixed quality.

use crate::error::DocToolsError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::ImageData;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// Compute the dimensions of `(width, height)` bounded by `max_edge`.
///
/// Images already within the bound are returned unchanged (never upscaled).
/// Otherwise both edges are scaled by the same ratio so the longest edge
/// equals `max_edge`; rounding keeps the ratio within one pixel.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }

    let ratio = (max_edge as f64 / width as f64).min(max_edge as f64 / height as f64);
    let w = ((width as f64 * ratio).round() as u32).clamp(1, max_edge);
    let h = ((height as f64 * ratio).round() as u32).clamp(1, max_edge);
    (w, h)
}

/// Downscale `img` with Lanczos3 if either edge exceeds `max_edge`.
pub fn downscale(img: DynamicImage, max_edge: u32) -> DynamicImage {
    let (w, h) = fit_within(img.width(), img.height(), max_edge);
    if (w, h) == (img.width(), img.height()) {
        return img;
    }
    debug!("Resizing {}x{} → {}x{}", img.width(), img.height(), w, h);
    img.resize_exact(w, h, FilterType::Lanczos3)
}

/// Encode `img` as an RGB JPEG at `quality`.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, DocToolsError> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .map_err(|e| DocToolsError::ImageEncode {
            detail: format!("JPEG encoding failed: {}", e),
        })?;
    Ok(buf)
}

/// Open an image file and turn it into the inline payload for a VLM request.
pub fn encode_image_file(
    path: &Path,
    max_edge: u32,
    quality: u8,
) -> Result<ImageData, DocToolsError> {
    let img = image::open(path).map_err(|source| DocToolsError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let img = downscale(img, max_edge);
    let jpeg = encode_jpeg(&img, quality)?;
    let b64 = STANDARD.encode(&jpeg);
    debug!("Encoded {} → {} bytes base64", path.display(), b64.len());

    Ok(ImageData::new(b64, "image/jpeg"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn small_images_are_not_upscaled() {
        assert_eq!(fit_within(800, 600, 2000), (800, 600));
        assert_eq!(fit_within(2000, 2000, 2000), (2000, 2000));
    }

    #[test]
    fn longest_edge_is_bounded() {
        assert_eq!(fit_within(4000, 3000, 2000), (2000, 1500));
        assert_eq!(fit_within(3000, 4001, 2000), (1500, 2000));
        assert_eq!(fit_within(10000, 10, 2000), (2000, 2));
        assert_eq!(fit_within(1, 50000, 2000), (1, 2000));
    }

    #[test]
    fn aspect_ratio_within_one_pixel() {
        for &(w, h) in &[(2001, 1999), (4321, 1234), (2500, 7777), (6000, 6000)] {
            let (nw, nh) = fit_within(w, h, 2000);
            assert!(nw.max(nh) == 2000, "{w}x{h} → {nw}x{nh}");
            let expected_short = if w >= h {
                h as f64 * 2000.0 / w as f64
            } else {
                w as f64 * 2000.0 / h as f64
            };
            let short = nw.min(nh) as f64;
            assert!((short - expected_short).abs() <= 1.0, "{w}x{h} → {nw}x{nh}");
        }
    }

    #[test]
    fn downscale_resizes_large_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(300, 120, Rgba([0, 0, 0, 255])));
        let out = downscale(img, 100);
        assert_eq!((out.width(), out.height()), (100, 40));
    }

    #[test]
    fn encode_image_file_produces_jpeg_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        RgbaImage::from_pixel(64, 32, Rgba([255, 0, 0, 128]))
            .save(&path)
            .unwrap();

        let data = encode_image_file(&path, 2000, 85).expect("encode should succeed");
        assert_eq!(data.mime_type, "image/jpeg");

        let bytes = STANDARD.decode(&data.data).expect("valid base64");
        let decoded = image::load_from_memory(&bytes).expect("valid JPEG");
        assert_eq!((decoded.width(), decoded.height()), (64, 32));
        assert_eq!(decoded.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn undecodable_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = encode_image_file(&path, 2000, 85).unwrap_err();
        assert!(matches!(err, DocToolsError::ImageDecode { .. }));
        assert!(err.to_string().contains("broken.png"));
    }
}
