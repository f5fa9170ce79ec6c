// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/output.rs - 输出定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::frame::RgbFrame;
use crate::hand::HandReading;
use crate::{FromUrl, FromUrlWithScheme};
use thiserror::Error;
use url::Url;

/// 渲染后是否继续处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFlow {
  Continue,
  Stop,
}

pub trait Render<Frame, Output: ?Sized> {
  type Error;
  fn render_result(&mut self, frame: &Frame, result: &Output) -> Result<RenderFlow, Self::Error>;

  fn finish(&mut self) -> Result<(), Self::Error> {
    Ok(())
  }
}

pub mod draw;

mod save_image_file;
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

mod directory_record;
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

#[cfg(feature = "window_output")]
mod window_output;
#[cfg(feature = "window_output")]
pub use self::window_output::{WindowOutput, WindowOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[cfg(feature = "window_output")]
  #[error("窗口输出错误: {0}")]
  WindowOutputError(#[from] WindowOutputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum OutputWrapper {
  SaveImageFileOutput(SaveImageFileOutput),
  DirectoryRecordOutput(DirectoryRecordOutput),
  #[cfg(feature = "window_output")]
  WindowOutput(Box<WindowOutput>),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      SaveImageFileOutput::SCHEME => {
        let output = SaveImageFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveImageFileOutput(output))
      }
      DirectoryRecordOutput::SCHEME => {
        let output = DirectoryRecordOutput::from_url(url)?;
        Ok(OutputWrapper::DirectoryRecordOutput(output))
      }
      #[cfg(feature = "window_output")]
      WindowOutput::SCHEME => {
        let output = WindowOutput::from_url(url)?;
        Ok(OutputWrapper::WindowOutput(Box::new(output)))
      }
      _ => Err(OutputError::SchemeMismatch),
    }
  }
}

impl Render<RgbFrame, [HandReading]> for OutputWrapper {
  type Error = OutputError;

  fn render_result(
    &mut self,
    frame: &RgbFrame,
    result: &[HandReading],
  ) -> Result<RenderFlow, Self::Error> {
    match self {
      OutputWrapper::SaveImageFileOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      OutputWrapper::DirectoryRecordOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "window_output")]
      OutputWrapper::WindowOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }

  fn finish(&mut self) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::SaveImageFileOutput(output) => output.finish().map_err(OutputError::from),
      OutputWrapper::DirectoryRecordOutput(output) => output.finish().map_err(OutputError::from),
      #[cfg(feature = "window_output")]
      OutputWrapper::WindowOutput(output) => output.finish().map_err(OutputError::from),
    }
  }
}
