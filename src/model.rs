// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/model.rs - 手部关键点模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

//! 手部检测与关键点定位由外部模型完成，本模块只定义能力边界：
//! 给定一帧图像，返回零只或多只手，每只手 21 个有序关键点以及左右标签。

use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RgbFrame,
  hand::{LANDMARK_COUNT, NormalizedLandmark},
};

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 模型检测到的一只手
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedHand {
  /// 模型原始的左右标签（镜像前）
  pub label: Option<String>,
  pub score: f32,
  pub landmarks: [NormalizedLandmark; LANDMARK_COUNT],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandDetections {
  pub hands: Box<[DetectedHand]>,
}

impl HandDetections {
  pub fn is_empty(&self) -> bool {
    self.hands.is_empty()
  }

  pub fn len(&self) -> usize {
    self.hands.len()
  }
}

impl From<Vec<DetectedHand>> for HandDetections {
  fn from(hands: Vec<DetectedHand>) -> Self {
    Self {
      hands: hands.into_boxed_slice(),
    }
  }
}

mod replay;
pub use self::replay::{ReplayModel, ReplayModelError};

/// 不检测任何手，用于摄像头预览
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHandsModel;

impl FromUrlWithScheme for NoHandsModel {
  const SCHEME: &'static str = "none";
}

impl FromUrl for NoHandsModel {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ModelError::SchemeMismatch);
    }
    Ok(NoHandsModel)
  }
}

impl Model for NoHandsModel {
  type Input = RgbFrame;
  type Output = HandDetections;
  type Error = ModelError;

  fn infer(&self, _input: &Self::Input) -> Result<Self::Output, Self::Error> {
    Ok(HandDetections::default())
  }
}

#[derive(Error, Debug)]
pub enum ModelError {
  #[error("关键点回放错误: {0}")]
  ReplayModelError(#[from] ReplayModelError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum ModelWrapper {
  Replay(ReplayModel),
  NoHands(NoHandsModel),
}

impl FromUrl for ModelWrapper {
  type Error = ModelError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      ReplayModel::SCHEME => Ok(ModelWrapper::Replay(ReplayModel::from_url(url)?)),
      NoHandsModel::SCHEME => Ok(ModelWrapper::NoHands(NoHandsModel::from_url(url)?)),
      _ => Err(ModelError::SchemeMismatch),
    }
  }
}

impl Model for ModelWrapper {
  type Input = RgbFrame;
  type Output = HandDetections;
  type Error = ModelError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    match self {
      ModelWrapper::Replay(model) => model.infer(input).map_err(ModelError::from),
      ModelWrapper::NoHands(model) => model.infer(input),
    }
  }
}
