// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/main.rs - 项目主程序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

mod args;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shouzhi::{
  FromUrl,
  input::InputWrapper,
  model::ModelWrapper,
  output::OutputWrapper,
  processor::HandProcessor,
  record::ReadingLog,
  task::{HandCountTask, RunFlag, Task},
};

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = args::Args::parse();

  info!("模型: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("输出: {}", args.output);

  let input = InputWrapper::from_url(&args.input)?;
  let (width, height) = input.dimensions();
  info!("输入源已打开: {}x{}", width, height);

  let model = ModelWrapper::from_url(&args.model)?;
  let output = OutputWrapper::from_url(&args.output)?;
  let log = args.log.as_ref().map(ReadingLog::create).transpose()?;
  let processor = HandProcessor::default()
    .with_landmarks(!args.no_landmarks)
    .with_log(log);

  let flag = RunFlag::running();
  flag.stop_on_ctrlc()?;

  let summary = HandCountTask::new(processor, flag)
    .with_frame_number(args.frame_number)
    .run_task(input, model, output)?;

  info!("处理完成! 总帧数: {}, 计数: {}", summary.frames, summary.readings);
  Ok(())
}
