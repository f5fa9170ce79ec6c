// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/config.rs - 采集与显示配置
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

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

pub const DEFAULT_CAMERA_INDEX: usize = 0;
pub const DEFAULT_WINDOW_TITLE: &str = "Hand Detection - ESC to close";
pub const DEFAULT_LOG_FILE: &str = "hand-readings.jsonl";

/// 窗口宽度滑块范围
pub const MIN_WINDOW_WIDTH: u32 = 640;
pub const MAX_WINDOW_WIDTH: u32 = 1920;
pub const DEFAULT_WINDOW_WIDTH: u32 = 1600;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
  #[error("分辨率格式错误: {0}，应为 WxH")]
  InvalidResolution(String),
  #[error("不支持的分辨率: {0}")]
  UnsupportedResolution(Resolution),
}

/// 采集分辨率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
  pub width: u32,
  pub height: u32,
}

impl Resolution {
  pub const FULL_HD: Resolution = Resolution::new(1920, 1080);
  pub const HD: Resolution = Resolution::new(1280, 720);
  pub const VGA: Resolution = Resolution::new(640, 480);

  /// 控制面板可选的分辨率
  pub const SUPPORTED: [Resolution; 3] = [Self::FULL_HD, Self::HD, Self::VGA];

  pub const fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }

  pub fn is_supported(&self) -> bool {
    Self::SUPPORTED.contains(self)
  }

  /// 按该分辨率的宽高比推导窗口高度
  pub fn window_for_width(&self, width: u32) -> WindowSize {
    let height = (width as u64 * self.height as u64 / self.width.max(1) as u64) as u32;
    WindowSize { width, height }
  }
}

impl Default for Resolution {
  fn default() -> Self {
    Self::FULL_HD
  }
}

impl fmt::Display for Resolution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

impl FromStr for Resolution {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ConfigError::InvalidResolution(s.to_string());
    let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
      return Err(invalid());
    }
    Ok(Resolution::new(width, height))
  }
}

/// 显示窗口的像素尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
  pub width: u32,
  pub height: u32,
}

impl Default for WindowSize {
  fn default() -> Self {
    Resolution::default().window_for_width(DEFAULT_WINDOW_WIDTH)
  }
}

impl fmt::Display for WindowSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

/// 将滑块值限制在允许范围内
pub fn clamp_window_width(width: u32) -> u32 {
  width.clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_WIDTH)
}

/// 一次采集会话的全部参数
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
  pub camera_index: usize,
  pub resolution: Resolution,
  pub window: WindowSize,
  pub model: Url,
  pub log_enabled: bool,
  pub log_file: PathBuf,
  pub show_landmarks: bool,
}

impl SessionSettings {
  pub fn new(model: Url) -> Self {
    Self {
      camera_index: DEFAULT_CAMERA_INDEX,
      resolution: Resolution::default(),
      window: WindowSize::default(),
      model,
      log_enabled: false,
      log_file: PathBuf::from(DEFAULT_LOG_FILE),
      show_landmarks: true,
    }
  }

  /// 摄像头输入地址
  pub fn input_url(&self) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
      "camera://{}?width={}&height={}",
      self.camera_index, self.resolution.width, self.resolution.height
    ))
  }

  /// 显示窗口地址
  pub fn output_url(&self) -> Result<Url, url::ParseError> {
    let mut url = Url::parse("window://")?;
    url
      .query_pairs_mut()
      .append_pair("width", &self.window.width.to_string())
      .append_pair("height", &self.window.height.to_string())
      .append_pair("title", DEFAULT_WINDOW_TITLE);
    Ok(url)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_and_prints_resolutions() {
    assert_eq!("1280x720".parse::<Resolution>(), Ok(Resolution::HD));
    assert_eq!(" 640X480 ".parse::<Resolution>(), Ok(Resolution::VGA));
    assert_eq!(Resolution::FULL_HD.to_string(), "1920x1080");
    assert!("1280".parse::<Resolution>().is_err());
    assert!("0x720".parse::<Resolution>().is_err());
    assert!(!Resolution::new(800, 600).is_supported());
  }

  #[test]
  fn window_height_follows_aspect_ratio() {
    assert_eq!(
      Resolution::FULL_HD.window_for_width(1600),
      WindowSize {
        width: 1600,
        height: 900
      }
    );
    assert_eq!(Resolution::VGA.window_for_width(1000).height, 750);
    assert_eq!(Resolution::HD.window_for_width(641).height, 360);
  }

  #[test]
  fn slider_is_clamped() {
    assert_eq!(clamp_window_width(100), MIN_WINDOW_WIDTH);
    assert_eq!(clamp_window_width(5000), MAX_WINDOW_WIDTH);
    assert_eq!(clamp_window_width(1200), 1200);
  }

  #[test]
  fn session_urls_carry_settings() {
    let mut settings = SessionSettings::new(Url::parse("none://").unwrap());
    settings.camera_index = 2;
    settings.resolution = Resolution::VGA;
    settings.window = Resolution::VGA.window_for_width(800);

    let input = settings.input_url().unwrap();
    assert_eq!(input.scheme(), "camera");
    assert_eq!(input.host_str(), Some("2"));
    assert_eq!(input.query(), Some("width=640&height=480"));

    let output = settings.output_url().unwrap();
    let pairs: Vec<_> = output.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("width".to_string(), "800".to_string())));
    assert!(pairs.contains(&("height".to_string(), "600".to_string())));
    assert!(pairs.contains(&("title".to_string(), DEFAULT_WINDOW_TITLE.to_string())));
  }
}
