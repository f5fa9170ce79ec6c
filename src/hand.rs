// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/hand.rs - 手部关键点数据模型
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

//! 手部关键点的编号沿用外部模型的固定解剖学编号：
//! 0 为手腕，4 为拇指指尖，8/12/16/20 为食指、中指、无名指、小指指尖，
//! 每个指尖向后两个编号（`tip - 2`）为该手指的中间关节。

use std::fmt;
use std::ops::Index;

use serde::Serialize;

/// 每只手的关键点数量
pub const LANDMARK_COUNT: usize = 21;

pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;

/// 食指、中指、无名指、小指指尖
pub const FINGER_TIPS: [usize; 4] = [8, 12, 16, 20];

/// 手部骨架连线
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
  (0, 1),
  (1, 2),
  (2, 3),
  (3, 4),
  (0, 5),
  (5, 6),
  (6, 7),
  (7, 8),
  (5, 9),
  (9, 10),
  (10, 11),
  (11, 12),
  (9, 13),
  (13, 14),
  (14, 15),
  (15, 16),
  (13, 17),
  (0, 17),
  (17, 18),
  (18, 19),
  (19, 20),
];

/// 像素坐标系下的关键点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LandmarkPoint {
  pub x: i32,
  pub y: i32,
}

impl LandmarkPoint {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }
}

/// 模型输出的归一化关键点，z 保留但不参与计算
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedLandmark {
  pub x: f32,
  pub y: f32,
  pub z: f32,
}

impl NormalizedLandmark {
  /// 按帧宽高缩放并向零截断
  pub fn to_pixel(&self, width: u32, height: u32) -> LandmarkPoint {
    LandmarkPoint {
      x: (self.x * width as f32) as i32,
      y: (self.y * height as f32) as i32,
    }
  }
}

/// 手的左右
///
/// 模型给出的标签相对前置摄像头是镜像的：模型的 "Left" 对应画面中的右手。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Handedness {
  Left,
  Right,
  Unknown,
}

impl Handedness {
  /// 将模型标签翻转为画面中的左右
  pub fn from_model_label(label: Option<&str>) -> Self {
    match label {
      Some(label) if label.eq_ignore_ascii_case("left") => Handedness::Right,
      Some(label) if label.eq_ignore_ascii_case("right") => Handedness::Left,
      _ => Handedness::Unknown,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Handedness::Left => "Left",
      Handedness::Right => "Right",
      Handedness::Unknown => "Unknown",
    }
  }

  /// 镜像后的另一侧，Unknown 保持不变
  pub fn mirrored(&self) -> Self {
    match self {
      Handedness::Left => Handedness::Right,
      Handedness::Right => Handedness::Left,
      Handedness::Unknown => Handedness::Unknown,
    }
  }
}

impl fmt::Display for Handedness {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// 一只手的 21 个像素关键点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandLandmarks([LandmarkPoint; LANDMARK_COUNT]);

impl HandLandmarks {
  pub fn new(points: [LandmarkPoint; LANDMARK_COUNT]) -> Self {
    Self(points)
  }

  pub fn from_normalized(
    landmarks: &[NormalizedLandmark; LANDMARK_COUNT],
    width: u32,
    height: u32,
  ) -> Self {
    Self(landmarks.map(|landmark| landmark.to_pixel(width, height)))
  }

  pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
    &self.0
  }

  pub fn points_mut(&mut self) -> &mut [LandmarkPoint; LANDMARK_COUNT] {
    &mut self.0
  }
}

impl Default for HandLandmarks {
  fn default() -> Self {
    Self([LandmarkPoint::default(); LANDMARK_COUNT])
  }
}

impl Index<usize> for HandLandmarks {
  type Output = LandmarkPoint;

  fn index(&self, index: usize) -> &Self::Output {
    &self.0[index]
  }
}

/// 单帧单手的计数结果，不跨帧跟踪
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandReading {
  pub frame: u64,
  pub side: Handedness,
  pub fingers: u8,
  pub points: HandLandmarks,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn model_labels_are_mirrored() {
    assert_eq!(Handedness::from_model_label(Some("Left")), Handedness::Right);
    assert_eq!(Handedness::from_model_label(Some("Right")), Handedness::Left);
    assert_eq!(Handedness::from_model_label(Some("left")), Handedness::Right);
    assert_eq!(Handedness::from_model_label(Some("?")), Handedness::Unknown);
    assert_eq!(Handedness::from_model_label(None), Handedness::Unknown);
    assert_eq!(Handedness::Left.mirrored(), Handedness::Right);
    assert_eq!(Handedness::Right.mirrored().mirrored(), Handedness::Right);
    assert_eq!(Handedness::Unknown.mirrored(), Handedness::Unknown);
  }

  #[test]
  fn pixel_conversion_truncates() {
    let landmark = NormalizedLandmark {
      x: 0.5,
      y: 0.2499,
      z: -0.1,
    };
    assert_eq!(landmark.to_pixel(641, 480), LandmarkPoint::new(320, 119));
  }

  #[test]
  fn connections_stay_inside_the_hand() {
    for (a, b) in HAND_CONNECTIONS {
      assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
    }
    for tip in FINGER_TIPS {
      assert!(HAND_CONNECTIONS.contains(&(tip - 1, tip)));
    }
  }
}
