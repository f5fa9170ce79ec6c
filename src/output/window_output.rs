// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/output/window_output.rs - 窗口显示输出
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use minifb::{Key, ScaleMode, Window, WindowOptions};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  config::{DEFAULT_WINDOW_TITLE, WindowSize},
  frame::RgbFrame,
  hand::HandReading,
  output::{Render, RenderFlow},
};

#[derive(Error, Debug)]
pub enum WindowOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("窗口尺寸参数无效: {0}")]
  InvalidSize(String),
  #[error("窗口错误: {0}")]
  WindowError(#[from] minifb::Error),
}

/// 可缩放的显示窗口，按 ESC 或关闭窗口结束
///
/// `window://?width=1600&height=900&title=...`
pub struct WindowOutput {
  window: Window,
  title: String,
  buffer: Vec<u32>,
}

impl FromUrlWithScheme for WindowOutput {
  const SCHEME: &'static str = "window";
}

impl FromUrl for WindowOutput {
  type Error = WindowOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(WindowOutputError::SchemeMismatch);
    }

    let mut size = WindowSize::default();
    let mut title = DEFAULT_WINDOW_TITLE.to_string();
    for (key, value) in url.query_pairs() {
      match key.as_ref() {
        "width" => {
          size.width = value
            .parse()
            .map_err(|_| WindowOutputError::InvalidSize(value.to_string()))?
        }
        "height" => {
          size.height = value
            .parse()
            .map_err(|_| WindowOutputError::InvalidSize(value.to_string()))?
        }
        "title" => title = value.into_owned(),
        _ => {}
      }
    }

    Self::new(&title, size)
  }
}

impl WindowOutput {
  pub fn new(title: &str, size: WindowSize) -> Result<Self, WindowOutputError> {
    if size.width == 0 || size.height == 0 {
      return Err(WindowOutputError::InvalidSize(size.to_string()));
    }

    let window = Window::new(
      title,
      size.width as usize,
      size.height as usize,
      WindowOptions {
        resize: true,
        scale_mode: ScaleMode::AspectRatioStretch,
        ..WindowOptions::default()
      },
    )?;
    info!("显示窗口已创建: {} ({})", title, size);

    Ok(Self {
      window,
      title: title.to_string(),
      buffer: Vec::new(),
    })
  }
}

impl Render<RgbFrame, [HandReading]> for WindowOutput {
  type Error = WindowOutputError;

  fn render_result(
    &mut self,
    frame: &RgbFrame,
    _result: &[HandReading],
  ) -> Result<RenderFlow, Self::Error> {
    if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
      return Ok(RenderFlow::Stop);
    }

    self.buffer = frame.to_0rgb();
    self.window.update_with_buffer(
      &self.buffer,
      frame.width() as usize,
      frame.height() as usize,
    )?;

    if self.window.is_key_down(Key::Escape) {
      info!("收到 ESC，关闭窗口: {}", self.title);
      return Ok(RenderFlow::Stop);
    }
    Ok(RenderFlow::Continue)
  }
}
