// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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

use std::path::{Path, PathBuf};

use chrono::Datelike;
use thiserror::Error;
use tracing::info;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RgbFrame,
  hand::HandReading,
  output::{Render, RenderFlow},
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 按日期分目录保存标注后的帧
///
/// 默认只保存检测到手的帧，`?always` 保存全部帧；
/// `?record` 同时在图片旁写入每只手的计数（`side, fingers` 每行一只手）。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  frame_counter: u32,
  always: bool,
  record: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let always = uri.query_pairs().any(|(k, _)| k == "always");
    let record = uri.query_pairs().any(|(k, _)| k == "record");

    Ok(Self::new(uri.path()).with_always(always).with_record(record))
  }
}

impl DirectoryRecordOutput {
  pub fn new(directory: impl Into<PathBuf>) -> Self {
    Self {
      directory: directory.into(),
      frame_counter: 0,
      always: false,
      record: false,
    }
  }

  pub fn with_always(mut self, always: bool) -> Self {
    self.always = always;
    self
  }

  pub fn with_record(mut self, record: bool) -> Self {
    self.record = record;
    self
  }

  fn frame_id(&mut self) -> u32 {
    self.frame_counter += 1;
    self.frame_counter
  }

  fn frame_path(&mut self, frame: &RgbFrame) -> Result<PathBuf, DirectoryRecordOutputError> {
    let now = frame.captured_at;
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    std::fs::create_dir_all(&directory)?;

    Ok(directory.join(format!(
      "{}-{:06}.png",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }

  fn record(result: &[HandReading], path: &Path) -> Result<(), std::io::Error> {
    let records = result
      .iter()
      .map(|reading| format!("{}, {}", reading.side, reading.fingers))
      .collect::<Vec<_>>();
    std::fs::write(path.with_extension("txt"), records.join("\n"))
  }
}

impl Render<RgbFrame, [HandReading]> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(
    &mut self,
    frame: &RgbFrame,
    result: &[HandReading],
  ) -> Result<RenderFlow, Self::Error> {
    if self.always || !result.is_empty() {
      let path = self.frame_path(frame)?;
      frame.image.save(&path)?;
      if self.record {
        Self::record(result, &path)?;
      }
    }
    Ok(RenderFlow::Continue)
  }

  fn finish(&mut self) -> Result<(), Self::Error> {
    info!(
      "目录记录完成: {} 帧写入 {}",
      self.frame_counter,
      self.directory.display()
    );
    Ok(())
  }
}
