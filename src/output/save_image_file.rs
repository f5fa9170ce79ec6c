// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RgbFrame,
  hand::HandReading,
  output::{Render, RenderFlow},
};

/// 保存最近一帧标注结果，每帧覆盖写入同一文件
pub struct SaveImageFileOutput {
  path: PathBuf,
  saved: usize,
}

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

impl FromUrlWithScheme for SaveImageFileOutput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn from_url(uri: &Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(SaveImageFileError::SchemeMismatch(format!(
        "期望保存方式 '{}', 实际保存方式 '{}'",
        Self::SCHEME,
        uri.scheme()
      )));
    }

    Ok(Self::new(uri.path()))
  }
}

impl SaveImageFileOutput {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      saved: 0,
    }
  }
}

impl Render<RgbFrame, [HandReading]> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(
    &mut self,
    frame: &RgbFrame,
    _result: &[HandReading],
  ) -> Result<RenderFlow, Self::Error> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    frame.image.save(&self.path)?;
    self.saved += 1;
    Ok(RenderFlow::Continue)
  }

  fn finish(&mut self) -> Result<(), Self::Error> {
    info!("保存图像到文件: {} (共写入 {} 次)", self.path.display(), self.saved);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::RgbImage;

  #[test]
  fn saves_annotated_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("frame.png");
    let mut output = SaveImageFileOutput::new(&path);

    let frame = RgbFrame::new(3, RgbImage::new(4, 2));
    let flow = output.render_result(&frame, &[]).unwrap();
    assert_eq!(flow, RenderFlow::Continue);
    output.finish().unwrap();

    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (4, 2));
  }
}
