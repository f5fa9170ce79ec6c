// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/processor.rs - 单帧手部结果处理
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

use tracing::{debug, warn};

use crate::{
  estimator::FingerCountEstimator,
  frame::RgbFrame,
  hand::{HandLandmarks, HandReading, Handedness},
  model::HandDetections,
  output::draw::Draw,
  record::ReadingLog,
};

/// 将模型输出转为计数结果并绘制到帧上
pub struct HandProcessor {
  estimator: FingerCountEstimator,
  draw: Option<Draw>,
  log: Option<ReadingLog>,
}

impl Default for HandProcessor {
  fn default() -> Self {
    Self {
      estimator: FingerCountEstimator::default(),
      draw: Some(Draw::default()),
      log: None,
    }
  }
}

impl HandProcessor {
  pub fn with_landmarks(mut self, show: bool) -> Self {
    self.draw = show.then(Draw::default);
    self
  }

  pub fn with_log(mut self, log: Option<ReadingLog>) -> Self {
    self.log = log;
    self
  }

  pub fn log(&self) -> Option<&ReadingLog> {
    self.log.as_ref()
  }

  /// 处理一帧中的全部手，按模型给出的顺序返回结果
  pub fn process(&mut self, frame: &mut RgbFrame, detections: &HandDetections) -> Vec<HandReading> {
    let (width, height) = (frame.width(), frame.height());
    let mut readings = Vec::with_capacity(detections.len());

    for hand in detections.hands.iter() {
      let points = HandLandmarks::from_normalized(&hand.landmarks, width, height);
      if let Some(draw) = &self.draw {
        draw.draw_landmarks(&mut frame.image, &points);
      }

      let side = Handedness::from_model_label(hand.label.as_deref());
      let fingers = FingerCountEstimator::classify(&points, side);
      self.estimator.render(&mut frame.image, side, fingers, width);
      debug!(
        "帧 {}: {} 手 {} 指 (score {:.2})",
        frame.index, side, fingers, hand.score
      );

      let reading = HandReading {
        frame: frame.index,
        side,
        fingers,
        points,
      };
      if let Some(log) = &mut self.log
        && let Err(e) = log.append(&reading)
      {
        warn!("写入计数日志失败: {}", e);
      }
      readings.push(reading);
    }

    readings
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::estimator::LABEL_BOX_WIDTH;
  use crate::hand::{LANDMARK_COUNT, NormalizedLandmark};
  use crate::model::DetectedHand;
  use image::{Rgb, RgbImage};

  /// 四指朝上、拇指向画面右侧伸出的手（归一化坐标）
  fn open_hand(label: &str) -> DetectedHand {
    let mut landmarks = [NormalizedLandmark {
      x: 0.5,
      y: 0.8,
      z: 0.0,
    }; LANDMARK_COUNT];
    for (finger, tip) in [8usize, 12, 16, 20].into_iter().enumerate() {
      let x = 0.4 + finger as f32 * 0.05;
      landmarks[tip - 2] = NormalizedLandmark { x, y: 0.5, z: 0.0 };
      landmarks[tip] = NormalizedLandmark { x, y: 0.3, z: 0.0 };
    }
    landmarks[3] = NormalizedLandmark {
      x: 0.55,
      y: 0.7,
      z: 0.0,
    };
    landmarks[4] = NormalizedLandmark {
      x: 0.62,
      y: 0.65,
      z: 0.0,
    };
    DetectedHand {
      label: Some(label.to_string()),
      score: 0.95,
      landmarks,
    }
  }

  #[test]
  fn counts_and_annotates_each_hand() {
    let mut processor = HandProcessor::default().with_landmarks(false);
    let mut frame = RgbFrame::new(5, RgbImage::new(640, 480));
    // 模型的 "Left" 在画面中是右手
    let detections = HandDetections::from(vec![open_hand("Left"), open_hand("Right")]);

    let readings = processor.process(&mut frame, &detections);
    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].side, Handedness::Right);
    assert_eq!(readings[0].fingers, 5);
    assert_eq!(readings[1].side, Handedness::Left);
    assert_eq!(readings[1].fingers, 4);
    assert!(readings.iter().all(|r| r.frame == 5));
    assert_eq!(readings[0].points[8].y, 144);

    let blue = Rgb([0, 0, 255]);
    assert_eq!(frame.image.get_pixel(12, 105), &blue);
    assert_eq!(frame.image.get_pixel(452, 105), &blue);
    assert_eq!(frame.image.get_pixel(10 + LABEL_BOX_WIDTH + 5, 50), &Rgb([0, 0, 0]));
  }

  #[test]
  fn no_hands_leaves_frame_untouched() {
    let mut processor = HandProcessor::default();
    let mut frame = RgbFrame::new(0, RgbImage::new(64, 48));
    let readings = processor.process(&mut frame, &HandDetections::default());
    assert!(readings.is_empty());
    assert!(frame.image.pixels().all(|p| *p == Rgb([0, 0, 0])));
  }

  #[test]
  fn logs_readings_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hands.jsonl");
    let log = ReadingLog::create(&path).unwrap();
    let mut processor = HandProcessor::default().with_log(Some(log));

    let mut frame = RgbFrame::new(1, RgbImage::new(320, 240));
    let detections = HandDetections::from(vec![open_hand("Left")]);
    processor.process(&mut frame, &detections);
    processor.process(&mut frame, &detections);

    assert_eq!(processor.log().map(|l| l.written()), Some(2));
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
  }
}
