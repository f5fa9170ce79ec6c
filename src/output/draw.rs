// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/output/draw.rs - 手部关键点可视化
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut};

use crate::hand::{HAND_CONNECTIONS, HandLandmarks};

// 文本渲染常量
const INDEX_FONT_SIZE: f32 = 14.0;
const INDEX_TEXT_OFFSET: i32 = 10; // 编号基线位于关键点下方
const INDEX_TEXT_HEIGHT: i32 = 10;
const POINT_RADIUS: i32 = 2;
const LINE_COLOR: [u8; 3] = [255, 0, 0]; // 红色
const POINT_COLOR: [u8; 3] = [0, 255, 0]; // 绿色
const INDEX_COLOR: [u8; 3] = [0, 0, 255]; // 蓝色

/// 加载内嵌字体
pub fn embedded_font() -> FontArc {
  let font_data = include_bytes!("../../assets/DejaVuSans.ttf");
  FontArc::try_from_slice(font_data).expect("无法加载嵌入的字体文件")
}

/// 手部骨架与关键点编号绘制
pub struct Draw {
  font: FontArc,
  index_scale: PxScale,
  line_color: Rgb<u8>,
  point_color: Rgb<u8>,
  index_color: Rgb<u8>,
  with_index: bool,
}

impl Default for Draw {
  fn default() -> Self {
    Self::with_font(embedded_font())
  }
}

impl Draw {
  pub fn with_font(font: FontArc) -> Self {
    Self {
      font,
      index_scale: PxScale::from(INDEX_FONT_SIZE),
      line_color: Rgb(LINE_COLOR),
      point_color: Rgb(POINT_COLOR),
      index_color: Rgb(INDEX_COLOR),
      with_index: true,
    }
  }

  pub fn with_index(mut self, with_index: bool) -> Self {
    self.with_index = with_index;
    self
  }

  /// 绘制骨架连线、关键点以及编号
  pub fn draw_landmarks(&self, image: &mut RgbImage, points: &HandLandmarks) {
    for (start, end) in HAND_CONNECTIONS {
      let (a, b) = (points[start], points[end]);
      // 线宽 2 像素
      for (dx, dy) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)] {
        draw_line_segment_mut(
          image,
          (a.x as f32 + dx, a.y as f32 + dy),
          (b.x as f32 + dx, b.y as f32 + dy),
          self.line_color,
        );
      }
    }

    for (id, point) in points.points().iter().enumerate() {
      draw_filled_circle_mut(image, (point.x, point.y), POINT_RADIUS, self.point_color);

      if self.with_index {
        draw_text_mut(
          image,
          self.index_color,
          point.x,
          point.y + INDEX_TEXT_OFFSET - INDEX_TEXT_HEIGHT,
          self.index_scale,
          &self.font,
          &id.to_string(),
        );
      }
    }
  }
}
