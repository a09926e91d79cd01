//! PatternCodec - black/white images to and from bipolar vectors.
//!
//! Pixels are read row-major (`index = y * width + x`). A fully white pixel
//! (luma 255) maps to +1; every other value maps to -1. Encoding writes +1 as
//! white and -1 as black.

use crate::{BipolarVector, HopfieldError, Result};
use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};

const WHITE: u8 = 255;
const BLACK: u8 = 0;

/// Converts images of a fixed size to bipolar vectors and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternCodec {
    width: u32,
    height: u32,
}

impl PatternCodec {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Vector length produced by this codec.
    pub fn num_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Decode a grayscale image.
    ///
    /// # Errors
    ///
    /// Returns `ImageSizeMismatch` if the image is not `width` x `height`,
    /// even when the pixel count happens to match.
    pub fn decode(&self, image: &GrayImage) -> Result<BipolarVector> {
        let (width, height) = image.dimensions();
        if (width, height) != (self.width, self.height) {
            return Err(HopfieldError::ImageSizeMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width,
                height,
            });
        }
        Ok(BipolarVector::from_bools(
            image.pixels().map(|&Luma([luma])| luma == WHITE),
        ))
    }

    /// Encode a vector as a black/white image.
    pub fn encode(&self, pattern: &BipolarVector) -> Result<GrayImage> {
        if pattern.len() != self.num_pixels() {
            return Err(HopfieldError::DimensionMismatch {
                expected: self.num_pixels(),
                actual: pattern.len(),
            });
        }
        let raw = pattern
            .iter()
            .map(|v| if v == 1 { WHITE } else { BLACK })
            .collect();
        GrayImage::from_raw(self.width, self.height, raw)
            .ok_or_else(|| HopfieldError::Other("image buffer size mismatch".to_string()))
    }

    /// Load an image file, converting it to 8-bit luma first.
    pub fn load_png<P: AsRef<Path>>(&self, path: P) -> Result<BipolarVector> {
        let image = image::open(path.as_ref())?.to_luma8();
        self.decode(&image)
    }

    /// Write a vector as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P, pattern: &BipolarVector) -> Result<()> {
        self.encode(pattern)?.save(path.as_ref())?;
        Ok(())
    }

    /// Load every `*.png` in `dir`, in file-name order.
    ///
    /// # Errors
    ///
    /// - `EmptyTrainingSet` if the directory holds no PNG files
    /// - `ImageSizeMismatch` if an image has the wrong size
    pub fn load_corpus<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<BipolarVector>> {
        let paths = corpus_files(dir.as_ref())?;
        if paths.is_empty() {
            return Err(HopfieldError::EmptyTrainingSet);
        }

        let mut patterns = Vec::with_capacity(paths.len());
        for path in &paths {
            tracing::debug!(path = %path.display(), "loading training pattern");
            patterns.push(self.load_png(path)?);
        }
        Ok(patterns)
    }
}

/// Sorted list of `*.png` files directly inside `dir`.
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if path.is_file() && is_png {
            paths.push(path);
        } else {
            tracing::warn!(path = %path.display(), "skipping non-PNG corpus entry");
        }
    }
    paths.sort();
    Ok(paths)
}
