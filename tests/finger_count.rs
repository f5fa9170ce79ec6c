// 该文件是 Shouzhi （手指计数） 项目的一部分。
// tests/finger_count.rs - 端到端计数测试
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

use std::io::Write;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use url::Url;

use shouzhi::{
  FromUrl,
  estimator::FingerCountEstimator,
  hand::{HandLandmarks, Handedness, LandmarkPoint},
  input::InputWrapper,
  model::ModelWrapper,
  output::OutputWrapper,
  processor::HandProcessor,
  record::ReadingLog,
  task::{HandCountTask, RunFlag, Task},
};

fn landmarks(points: &[(usize, i32, i32)]) -> HandLandmarks {
  let mut hand = HandLandmarks::default();
  for &(index, x, y) in points {
    hand.points_mut()[index] = LandmarkPoint::new(x, y);
  }
  hand
}

/// 模型标签为 "Right"（画面左手），五指张开
fn open_hand_line() -> String {
  let mut points = vec![[0.5f32, 0.8, 0.0]; 21];
  for tip in [8usize, 12, 16, 20] {
    points[tip - 2] = [0.5, 0.5, 0.0];
    points[tip] = [0.5, 0.2, 0.0];
  }
  points[3] = [0.4, 0.6, 0.0];
  points[4] = [0.3, 0.6, 0.0];
  let landmarks = points
    .iter()
    .map(|[x, y, z]| format!("[{x},{y},{z}]"))
    .collect::<Vec<_>>()
    .join(",");
  format!(r#"{{"hands":[{{"label":"Right","score":0.97,"landmarks":[{landmarks}]}}]}}"#)
}

fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
  let mut found = Vec::new();
  let mut pending = vec![dir.to_path_buf()];
  while let Some(current) = pending.pop() {
    for entry in std::fs::read_dir(current).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        pending.push(path);
      } else if path.extension() == Some(std::ffi::OsStr::new(ext)) {
        found.push(path);
      }
    }
  }
  found
}

#[test]
fn worked_example_counts_four() {
  let hand = landmarks(&[
    (3, 250, 0),
    (4, 300, 0),
    (6, 0, 200),
    (8, 0, 150),
    (10, 0, 200),
    (12, 0, 150),
    (14, 0, 200),
    (16, 0, 250),
    (18, 0, 200),
    (20, 0, 150),
  ]);
  assert_eq!(FingerCountEstimator::classify(&hand, Handedness::Right), 4);
  assert_eq!(FingerCountEstimator::classify(&hand, Handedness::Left), 3);
  assert_eq!(FingerCountEstimator::classify(&hand, Handedness::Unknown), 3);
}

#[test]
fn flat_hand_counts_zero() {
  let hand = landmarks(&[(3, 100, 0), (4, 100, 0)]);
  assert_eq!(FingerCountEstimator::classify(&hand, Handedness::Left), 0);
  assert_eq!(FingerCountEstimator::classify(&hand, Handedness::Right), 0);
}

#[test]
fn replayed_hands_flow_through_the_pipeline() {
  let dir = tempfile::tempdir().unwrap();

  let image_path = dir.path().join("still.png");
  RgbImage::from_pixel(640, 480, Rgb([20, 20, 20]))
    .save(&image_path)
    .unwrap();

  let replay_path = dir.path().join("hands.jsonl");
  let mut replay = std::fs::File::create(&replay_path).unwrap();
  writeln!(replay, "{}", open_hand_line()).unwrap();
  drop(replay);

  let frames = dir.path().join("frames");
  let log_path = dir.path().join("log").join("readings.jsonl");

  let input =
    InputWrapper::from_url(&Url::parse(&format!("image://{}", image_path.display())).unwrap())
      .unwrap();
  let model =
    ModelWrapper::from_url(&Url::parse(&format!("replay://{}", replay_path.display())).unwrap())
      .unwrap();
  let output =
    OutputWrapper::from_url(&Url::parse(&format!("folder://{}?record", frames.display())).unwrap())
      .unwrap();

  let processor = HandProcessor::default().with_log(Some(ReadingLog::create(&log_path).unwrap()));
  let flag = RunFlag::running();
  let summary = HandCountTask::new(processor, flag.clone())
    .run_task(input, model, output)
    .unwrap();

  assert_eq!(summary.frames, 1);
  assert_eq!(summary.skipped, 0);
  assert_eq!(summary.readings, 1);
  assert!(!flag.is_running());

  assert_eq!(files_with_extension(&frames, "png").len(), 1);
  let records = files_with_extension(&frames, "txt");
  assert_eq!(records.len(), 1);
  assert_eq!(std::fs::read_to_string(&records[0]).unwrap().trim(), "Left, 5");

  let log = std::fs::read_to_string(&log_path).unwrap();
  let entry: serde_json::Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
  assert_eq!(entry["side"], "Left");
  assert_eq!(entry["fingers"], 5);
  assert_eq!(entry["frame"], 0);
  assert_eq!(entry["points"][8], serde_json::json!([320, 96]));
}

#[test]
fn unknown_schemes_are_rejected() {
  let url = Url::parse("rtsp://camera.local/stream").unwrap();
  assert!(InputWrapper::from_url(&url).is_err());
  assert!(ModelWrapper::from_url(&url).is_err());
  assert!(OutputWrapper::from_url(&url).is_err());
}
