// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/estimator.rs - 手指计数与结果标注
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

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::hand::{FINGER_TIPS, HandLandmarks, Handedness, THUMB_IP, THUMB_TIP};
use crate::output::draw::embedded_font;

// 标注框常量
pub const LABEL_BOX_WIDTH: u32 = 170;
pub const LABEL_BOX_HEIGHT: u32 = 100;
pub const LABEL_OFFSET: (i32, i32) = (10, 10);
/// 左手标注框相对帧右边缘的偏移
pub const LEFT_HAND_SHIFT: i32 = -200;

const LABEL_FONT_SIZE: f32 = 30.0;
const SIDE_TEXT_OFFSET: (i32, i32) = (10, 6);
const COUNT_TEXT_OFFSET: (i32, i32) = (10, 56);
const BOX_COLOR: [u8; 3] = [0, 0, 255]; // 蓝色
const TEXT_COLOR: [u8; 3] = [255, 255, 255]; // 白色

/// 基于关键点几何关系的手指计数器
///
/// 计数规则假设手指大体朝上、拇指未交叉，每帧独立计算，没有任何平滑。
pub struct FingerCountEstimator {
  font: FontArc,
  font_scale: PxScale,
  box_color: Rgb<u8>,
  text_color: Rgb<u8>,
}

impl Default for FingerCountEstimator {
  fn default() -> Self {
    Self::with_font(embedded_font())
  }
}

impl FingerCountEstimator {
  pub fn with_font(font: FontArc) -> Self {
    Self {
      font,
      font_scale: PxScale::from(LABEL_FONT_SIZE),
      box_color: Rgb(BOX_COLOR),
      text_color: Rgb(TEXT_COLOR),
    }
  }

  /// 统计伸出的手指数量 (0 - 5)
  ///
  /// 四指：指尖的纵坐标严格小于中间关节（`tip - 2`）即视为伸出。
  /// 拇指：左手要求指尖在关节左侧，右手要求在右侧，未知侧不计。
  pub fn classify(points: &HandLandmarks, side: Handedness) -> u8 {
    let thumb_tip = points[THUMB_TIP];
    let thumb_ip = points[THUMB_IP];
    let thumb_raised = match side {
      Handedness::Left => thumb_tip.x < thumb_ip.x,
      Handedness::Right => thumb_tip.x > thumb_ip.x,
      Handedness::Unknown => false,
    };

    let fingers_raised = FINGER_TIPS
      .iter()
      .filter(|&&tip| points[tip].y < points[tip - 2].y)
      .count() as u8;

    fingers_raised + u8::from(thumb_raised)
  }

  /// 标注框左上角位置，左手镜像到帧的右侧，不做边界检查
  pub fn label_origin(side: Handedness, frame_width: u32) -> (i32, i32) {
    let (x, y) = LABEL_OFFSET;
    match side {
      Handedness::Left => (frame_width as i32 + LEFT_HAND_SHIFT + x, y),
      Handedness::Right | Handedness::Unknown => (x, y),
    }
  }

  /// 在图像上绘制手的左右与手指数量
  pub fn render(&self, image: &mut RgbImage, side: Handedness, count: u8, frame_width: u32) {
    let (x, y) = Self::label_origin(side, frame_width);

    let rect = Rect::at(x, y).of_size(LABEL_BOX_WIDTH, LABEL_BOX_HEIGHT);
    draw_filled_rect_mut(image, rect, self.box_color);

    draw_text_mut(
      image,
      self.text_color,
      x + SIDE_TEXT_OFFSET.0,
      y + SIDE_TEXT_OFFSET.1,
      self.font_scale,
      &self.font,
      side.as_str(),
    );
    draw_text_mut(
      image,
      self.text_color,
      x + COUNT_TEXT_OFFSET.0,
      y + COUNT_TEXT_OFFSET.1,
      self.font_scale,
      &self.font,
      &format!("Fingers: {}", count),
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hand::{LANDMARK_COUNT, LandmarkPoint};

  fn hand(tips_raised: [bool; 4], thumb: (i32, i32)) -> HandLandmarks {
    let mut points = [LandmarkPoint::new(200, 200); LANDMARK_COUNT];
    for (tip, raised) in FINGER_TIPS.into_iter().zip(tips_raised) {
      points[tip - 2] = LandmarkPoint::new(200, 150);
      points[tip] = LandmarkPoint::new(200, if raised { 100 } else { 150 });
    }
    points[THUMB_TIP] = LandmarkPoint::new(thumb.0, 300);
    points[THUMB_IP] = LandmarkPoint::new(thumb.1, 300);
    HandLandmarks::new(points)
  }

  #[test]
  fn open_hand_counts_five() {
    let right = hand([true; 4], (300, 250));
    assert_eq!(FingerCountEstimator::classify(&right, Handedness::Right), 5);
    let left = hand([true; 4], (200, 250));
    assert_eq!(FingerCountEstimator::classify(&left, Handedness::Left), 5);
  }

  #[test]
  fn closed_hand_counts_zero() {
    // 指尖与关节同高不算伸出
    let fist = hand([false; 4], (250, 250));
    assert_eq!(FingerCountEstimator::classify(&fist, Handedness::Right), 0);
    assert_eq!(FingerCountEstimator::classify(&fist, Handedness::Left), 0);
  }

  #[test]
  fn swapping_side_only_changes_the_thumb() {
    for tips in [[true, false, true, false], [false; 4], [true; 4]] {
      let points = hand(tips, (300, 250));
      let right = FingerCountEstimator::classify(&points, Handedness::Right);
      let left = FingerCountEstimator::classify(&points, Handedness::Right.mirrored());
      let others = tips.iter().filter(|&&t| t).count() as u8;
      assert_eq!(right, others + 1);
      assert_eq!(left, others);
    }
  }

  #[test]
  fn unknown_side_never_counts_the_thumb() {
    let points = hand([true; 4], (300, 250));
    assert_eq!(FingerCountEstimator::classify(&points, Handedness::Unknown), 4);
  }

  #[test]
  fn classify_is_pure() {
    let points = hand([true, true, false, true], (300, 250));
    let first = FingerCountEstimator::classify(&points, Handedness::Right);
    for _ in 0..10 {
      assert_eq!(FingerCountEstimator::classify(&points, Handedness::Right), first);
    }
  }

  #[test]
  fn three_fingers_and_thumb() {
    let mut points = [LandmarkPoint::default(); LANDMARK_COUNT];
    points[8].y = 100;
    points[6].y = 150;
    points[12].y = 100;
    points[10].y = 150;
    points[16].y = 200;
    points[14].y = 150;
    points[20].y = 100;
    points[18].y = 150;
    points[4].x = 300;
    points[3].x = 250;
    let points = HandLandmarks::new(points);
    assert_eq!(FingerCountEstimator::classify(&points, Handedness::Right), 4);
  }

  #[test]
  fn label_placement() {
    for width in [320, 640, 1920] {
      assert_eq!(
        FingerCountEstimator::label_origin(Handedness::Right, width),
        (10, 10)
      );
      assert_eq!(
        FingerCountEstimator::label_origin(Handedness::Unknown, width),
        (10, 10)
      );
    }
    assert_eq!(
      FingerCountEstimator::label_origin(Handedness::Left, 640),
      (450, 10)
    );
    // 过窄的帧允许出现负坐标
    assert_eq!(
      FingerCountEstimator::label_origin(Handedness::Left, 100),
      (-90, 10)
    );
  }

  #[test]
  fn render_fills_the_label_box() {
    let estimator = FingerCountEstimator::default();
    let mut image = RgbImage::new(640, 480);

    estimator.render(&mut image, Handedness::Right, 3, 640);
    assert_eq!(image.get_pixel(12, 105), &Rgb(BOX_COLOR));
    assert_eq!(image.get_pixel(178, 108), &Rgb(BOX_COLOR));
    assert_eq!(image.get_pixel(180, 10), &Rgb([0, 0, 0]));
    assert_eq!(image.get_pixel(10, 110), &Rgb([0, 0, 0]));

    estimator.render(&mut image, Handedness::Left, 1, 640);
    assert_eq!(image.get_pixel(452, 105), &Rgb(BOX_COLOR));
    assert_eq!(image.get_pixel(449, 50), &Rgb([0, 0, 0]));
    assert_eq!(image.get_pixel(620, 50), &Rgb([0, 0, 0]));
  }

  #[test]
  fn render_accepts_off_frame_boxes() {
    let estimator = FingerCountEstimator::default();
    let mut image = RgbImage::new(100, 60);
    estimator.render(&mut image, Handedness::Left, 5, 100);
    // 框的可见部分仍然被绘制
    assert_eq!(image.get_pixel(0, 58), &Rgb(BOX_COLOR));
  }
}
