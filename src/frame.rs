// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/frame.rs - RGB 帧定义
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

use chrono::{DateTime, Local};
use image::{Rgb, RgbImage};

const YUYV_BYTES_PER_PAIR: usize = 4;

/// 一帧 RGB 图像，附带采集序号与时间
#[derive(Debug, Clone)]
pub struct RgbFrame {
  pub index: u64,
  pub captured_at: DateTime<Local>,
  pub image: RgbImage,
}

impl RgbFrame {
  pub fn new(index: u64, image: RgbImage) -> Self {
    Self {
      index,
      captured_at: Local::now(),
      image,
    }
  }

  pub fn width(&self) -> u32 {
    self.image.width()
  }

  pub fn height(&self) -> u32 {
    self.image.height()
  }

  /// 从 YUYV (YUV 4:2:2) 数据构造帧，数据不足时返回 None
  pub fn from_yuyv(index: u64, data: &[u8], width: u32, height: u32) -> Option<Self> {
    let expected = width as usize * height as usize * 2;
    if data.len() < expected || width % 2 != 0 {
      return None;
    }

    let mut image = RgbImage::new(width, height);
    for (i, chunk) in data[..expected].chunks_exact(YUYV_BYTES_PER_PAIR).enumerate() {
      let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
      let pixel = (i * 2) as u32;
      let (x, y) = (pixel % width, pixel / width);
      image.put_pixel(x, y, yuv_to_rgb(y0, u, v));
      image.put_pixel(x + 1, y, yuv_to_rgb(y1, u, v));
    }

    Some(Self::new(index, image))
  }

  /// 转为 0RGB 打包格式（窗口缓冲区使用）
  pub fn to_0rgb(&self) -> Vec<u32> {
    self
      .image
      .pixels()
      .map(|Rgb([r, g, b])| ((*r as u32) << 16) | ((*g as u32) << 8) | (*b as u32))
      .collect()
  }
}

// BT.601
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> Rgb<u8> {
  let c = y as f32 - 16.0;
  let d = u as f32 - 128.0;
  let e = v as f32 - 128.0;

  let r = 1.164 * c + 1.596 * e;
  let g = 1.164 * c - 0.392 * d - 0.813 * e;
  let b = 1.164 * c + 2.017 * d;

  Rgb([
    r.round().clamp(0.0, 255.0) as u8,
    g.round().clamp(0.0, 255.0) as u8,
    b.round().clamp(0.0, 255.0) as u8,
  ])
}
