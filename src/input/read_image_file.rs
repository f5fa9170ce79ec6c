// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::{FromUrl, FromUrlWithScheme, frame::RgbFrame};

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::error;
use url::Url;

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 单张图片输入，只产生一帧
pub struct ImageFileInput {
  image: Option<RgbImage>,
  dimensions: (u32, u32),
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemaMismatch);
    }

    let image = ImageReader::open(url.path())?.decode()?;
    Ok(Self::from(image.to_rgb8()))
  }
}

impl From<RgbImage> for ImageFileInput {
  fn from(image: RgbImage) -> Self {
    Self {
      dimensions: image.dimensions(),
      image: Some(image),
    }
  }
}

impl ImageFileInput {
  pub fn dimensions(&self) -> (u32, u32) {
    self.dimensions
  }
}

impl Iterator for ImageFileInput {
  type Item = Result<RgbFrame, ImageFileInputError>;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take().map(|image| Ok(RgbFrame::new(0, image)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yields_a_single_frame() {
    let mut input = ImageFileInput::from(RgbImage::new(8, 6));
    assert_eq!(input.dimensions(), (8, 6));
    let frame = input.next().unwrap().unwrap();
    assert_eq!((frame.width(), frame.height()), (8, 6));
    assert!(input.next().is_none());
  }

  #[test]
  fn reads_png_from_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hand.png");
    RgbImage::new(5, 3).save(&path).unwrap();

    let url = Url::parse(&format!("image://{}", path.display())).unwrap();
    let input = ImageFileInput::from_url(&url).unwrap();
    assert_eq!(input.dimensions(), (5, 3));
  }
}
