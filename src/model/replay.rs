// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/model/replay.rs - 关键点回放模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

//! 回放外部检测器导出的关键点，每行一帧：
//!
//! ```text
//! {"hands":[{"label":"Left","score":0.98,"landmarks":[[0.51,0.83,0.0], ...]}]}
//! ```
//!
//! `label`、`score` 与 `z` 均可省略。每只手必须恰好 21 个关键点。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Mutex;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RgbFrame,
  hand::{LANDMARK_COUNT, NormalizedLandmark},
  model::{DetectedHand, HandDetections, Model},
};

#[derive(Error, Debug)]
pub enum ReplayModelError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("第 {line} 行 JSON 解析错误: {source}")]
  JsonError {
    line: usize,
    source: serde_json::Error,
  },
  #[error("第 {line} 行关键点数量错误: 期望 21, 实际 {found}")]
  LandmarkCount { line: usize, found: usize },
  #[error("第 {line} 行关键点坐标维度错误: {found}")]
  PointArity { line: usize, found: usize },
  #[error("内部状态锁已损坏")]
  Poisoned,
}

#[derive(Deserialize)]
struct ReplayFrame {
  #[serde(default)]
  hands: Vec<ReplayHand>,
}

#[derive(Deserialize)]
struct ReplayHand {
  #[serde(default)]
  label: Option<String>,
  #[serde(default)]
  score: Option<f32>,
  landmarks: Vec<Vec<f32>>,
}

impl ReplayHand {
  fn into_detected(self, line: usize) -> Result<DetectedHand, ReplayModelError> {
    if self.landmarks.len() != LANDMARK_COUNT {
      return Err(ReplayModelError::LandmarkCount {
        line,
        found: self.landmarks.len(),
      });
    }

    let mut landmarks = [NormalizedLandmark::default(); LANDMARK_COUNT];
    for (slot, point) in landmarks.iter_mut().zip(&self.landmarks) {
      *slot = match point.as_slice() {
        [x, y] => NormalizedLandmark { x: *x, y: *y, z: 0.0 },
        [x, y, z] => NormalizedLandmark {
          x: *x,
          y: *y,
          z: *z,
        },
        other => {
          return Err(ReplayModelError::PointArity {
            line,
            found: other.len(),
          });
        }
      };
    }

    Ok(DetectedHand {
      label: self.label,
      score: self.score.unwrap_or(1.0),
      landmarks,
    })
  }
}

/// 按帧回放关键点；回放结束后返回空结果，`?loop` 时从头开始
pub struct ReplayModel {
  frames: Box<[HandDetections]>,
  cursor: Mutex<usize>,
  looped: bool,
}

impl FromUrlWithScheme for ReplayModel {
  const SCHEME: &'static str = "replay";
}

impl FromUrl for ReplayModel {
  type Error = ReplayModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ReplayModelError::SchemeMismatch);
    }

    let looped = url.query_pairs().any(|(k, _)| k == "loop");
    let file = File::open(url.path())?;
    let model = Self::from_reader(BufReader::new(file))?.with_loop(looped);
    info!("已加载 {} 帧关键点: {}", model.len(), url.path());
    Ok(model)
  }
}

impl ReplayModel {
  pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ReplayModelError> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
      let line_no = index + 1;
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      let frame: ReplayFrame = serde_json::from_str(&line).map_err(|source| {
        ReplayModelError::JsonError {
          line: line_no,
          source,
        }
      })?;
      let hands = frame
        .hands
        .into_iter()
        .map(|hand| hand.into_detected(line_no))
        .collect::<Result<Vec<_>, _>>()?;
      frames.push(HandDetections::from(hands));
    }

    Ok(Self {
      frames: frames.into_boxed_slice(),
      cursor: Mutex::new(0),
      looped: false,
    })
  }

  pub fn with_loop(mut self, looped: bool) -> Self {
    self.looped = looped;
    self
  }

  pub fn len(&self) -> usize {
    self.frames.len()
  }

  pub fn is_empty(&self) -> bool {
    self.frames.is_empty()
  }
}

impl Model for ReplayModel {
  type Input = RgbFrame;
  type Output = HandDetections;
  type Error = ReplayModelError;

  fn infer(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let mut cursor = self.cursor.lock().map_err(|_| ReplayModelError::Poisoned)?;
    if *cursor >= self.frames.len() {
      if !self.looped || self.frames.is_empty() {
        debug!("关键点回放已结束");
        return Ok(HandDetections::default());
      }
      *cursor = 0;
    }

    let detections = self.frames[*cursor].clone();
    *cursor += 1;
    Ok(detections)
  }
}
