// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/task.rs - 采集处理任务
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

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::{thread, time::Duration};

use tracing::{error, info, warn};

use crate::{
  FromUrl,
  config::SessionSettings,
  frame::RgbFrame,
  hand::HandReading,
  input::InputWrapper,
  model::{HandDetections, Model, ModelWrapper},
  output::{OutputWrapper, Render, RenderFlow},
  processor::HandProcessor,
  record::ReadingLog,
};

/// 跨线程共享的运行标志，采集循环每帧检查一次
#[derive(Debug, Clone, Default)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
  pub fn running() -> Self {
    Self(Arc::new(AtomicBool::new(true)))
  }

  pub fn is_running(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }

  pub fn stop(&self) {
    self.0.store(false, Ordering::Release);
  }

  /// 在作用域结束时清除标志
  fn stop_on_drop(&self) -> StopOnDrop<'_> {
    StopOnDrop(self)
  }

  /// 注册 Ctrl-C 处理：清除标志，30 秒后仍未退出则强制结束进程
  pub fn stop_on_ctrlc(&self) -> Result<(), ctrlc::Error> {
    let flag = self.clone();
    ctrlc::set_handler(move || {
      info!("收到中断信号，准备退出...");
      flag.stop();
      thread::spawn(|| {
        thread::sleep(Duration::from_secs(30));
        warn!("强制退出程序");
        std::process::exit(1);
      });
    })
  }
}

struct StopOnDrop<'a>(&'a RunFlag);

impl Drop for StopOnDrop<'_> {
  fn drop(&mut self) {
    self.0.stop();
  }
}

pub trait Task<I, M, O>: Sized {
  type Output;
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<Self::Output, Self::Error>;
}

/// 任务结束时的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
  pub frames: u64,
  pub skipped: u64,
  pub readings: u64,
}

/// 顺序执行 采集 → 推理 → 计数/绘制 → 显示 的循环
pub struct HandCountTask {
  processor: HandProcessor,
  flag: RunFlag,
  frame_number: Option<usize>,
  read_error_limit: Option<u64>,
}

impl HandCountTask {
  pub fn new(processor: HandProcessor, flag: RunFlag) -> Self {
    Self {
      processor,
      flag,
      frame_number: None,
      read_error_limit: None,
    }
  }

  pub fn with_frame_number(mut self, frame_number: Option<usize>) -> Self {
    self.frame_number = frame_number.filter(|&n| n > 0);
    self
  }

  /// 读取失败次数超过上限时结束循环，`None` 表示一直跳过
  pub fn with_read_error_limit(mut self, limit: Option<u64>) -> Self {
    self.read_error_limit = limit;
    self
  }
}

impl<IE, ME, RE, I, M, O> Task<I, M, O> for HandCountTask
where
  IE: std::fmt::Display,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<RgbFrame, IE>>,
  M: Model<Input = RgbFrame, Output = HandDetections, Error = ME>,
  O: Render<RgbFrame, [HandReading], Error = RE>,
{
  type Output = TaskSummary;
  type Error = anyhow::Error;

  fn run_task(mut self, input: I, model: M, mut output: O) -> Result<Self::Output, Self::Error> {
    let flag = self.flag.clone();
    let _guard = flag.stop_on_drop();

    info!("开始任务...");
    let mut summary = TaskSummary::default();
    for frame_result in input {
      if !flag.is_running() {
        warn!("运行标志已清除，退出任务循环");
        break;
      }

      let mut frame = match frame_result {
        Ok(frame) => frame,
        Err(e) => {
          warn!("读取帧失败，跳过: {}", e);
          summary.skipped += 1;
          if self.read_error_limit.is_some_and(|n| summary.skipped > n) {
            error!("读取失败 {} 次，退出任务循环", summary.skipped);
            break;
          }
          continue;
        }
      };

      let now = std::time::Instant::now();
      let detections = model.infer(&frame)?;
      let elapsed_a = now.elapsed();
      let readings = self.processor.process(&mut frame, &detections);
      let flow = output.render_result(&frame, &readings)?;
      let elapsed_b = now.elapsed();

      summary.frames += 1;
      summary.readings += readings.len() as u64;
      info!(
        "第 {} 帧: {} 只手, 耗时: {:.2?} / {:.2?}",
        frame.index,
        readings.len(),
        elapsed_a,
        elapsed_b
      );

      if flow == RenderFlow::Stop {
        info!("输出请求结束，退出任务循环");
        break;
      }
      if self
        .frame_number
        .is_some_and(|n| summary.frames >= n as u64)
      {
        info!("达到指定帧数 {}, 退出任务循环", summary.frames);
        break;
      }
    }

    output.finish()?;
    info!(
      "任务完成: {} 帧, 跳过 {} 帧, {} 条计数",
      summary.frames, summary.skipped, summary.readings
    );
    Ok(summary)
  }
}

/// 按会话配置打开摄像头、模型与窗口并运行到结束
pub fn run_session(settings: &SessionSettings, flag: RunFlag) -> anyhow::Result<TaskSummary> {
  info!(
    "启动会话: 摄像头 {}, 分辨率 {}, 窗口 {}, 日志 {}",
    settings.camera_index,
    settings.resolution,
    settings.window,
    if settings.log_enabled { "开启" } else { "关闭" }
  );

  let input = InputWrapper::from_url(&settings.input_url()?)?;
  let (width, height) = input.dimensions();
  info!("输入源已打开: {}x{}", width, height);

  let model = ModelWrapper::from_url(&settings.model)?;
  let output = OutputWrapper::from_url(&settings.output_url()?)?;
  let log = if settings.log_enabled {
    Some(ReadingLog::create(&settings.log_file)?)
  } else {
    None
  };
  let processor = HandProcessor::default()
    .with_landmarks(settings.show_landmarks)
    .with_log(log);

  HandCountTask::new(processor, flag).run_task(input, model, output)
}
