// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/record.rs - 计数结果日志
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

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::hand::{HandReading, Handedness, LANDMARK_COUNT};

#[derive(Error, Debug)]
pub enum RecordError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ReadingRecord {
  time: String,
  frame: u64,
  side: Handedness,
  fingers: u8,
  points: [[i32; 2]; LANDMARK_COUNT],
}

impl ReadingRecord {
  fn new(reading: &HandReading, time: DateTime<Local>) -> Self {
    Self {
      time: time.to_rfc3339_opts(SecondsFormat::Millis, false),
      frame: reading.frame,
      side: reading.side,
      fingers: reading.fingers,
      points: reading.points.points().map(|p| [p.x, p.y]),
    }
  }
}

/// 以 JSON Lines 追加写入每只手的计数结果
pub struct ReadingLog<W: Write = BufWriter<File>> {
  writer: W,
  written: u64,
}

impl ReadingLog {
  pub fn create(path: impl AsRef<Path>) -> Result<Self, RecordError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    info!("计数日志写入: {}", path.display());
    Ok(Self::new(BufWriter::new(file)))
  }
}

impl<W: Write> ReadingLog<W> {
  pub fn new(writer: W) -> Self {
    Self { writer, written: 0 }
  }

  pub fn append(&mut self, reading: &HandReading) -> Result<(), RecordError> {
    self.append_at(reading, Local::now())
  }

  pub fn append_at(&mut self, reading: &HandReading, time: DateTime<Local>) -> Result<(), RecordError> {
    serde_json::to_writer(&mut self.writer, &ReadingRecord::new(reading, time))?;
    self.writer.write_all(b"\n")?;
    self.writer.flush()?;
    self.written += 1;
    Ok(())
  }

  pub fn written(&self) -> u64 {
    self.written
  }

  pub fn into_inner(self) -> W {
    self.writer
  }
}
