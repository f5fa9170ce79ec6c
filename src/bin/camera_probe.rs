// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/bin/camera_probe.rs - 摄像头分辨率探测与预览
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use shouzhi::{
  FromUrl,
  config::{DEFAULT_CAMERA_INDEX, Resolution, SessionSettings},
  input::InputWrapper,
  model::NoHandsModel,
  output::OutputWrapper,
  processor::HandProcessor,
  task::{HandCountTask, RunFlag, Task},
};

/// 以指定分辨率打开摄像头，输出实际分辨率并显示原始画面
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 摄像头编号
  #[arg(long, value_name = "INDEX", default_value_t = DEFAULT_CAMERA_INDEX)]
  pub camera: usize,
  /// 请求的分辨率
  #[arg(long, value_name = "WxH", default_value = "1920x1080")]
  pub resolution: Resolution,
  /// 只探测分辨率，不打开窗口
  #[arg(long)]
  pub probe_only: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();

  let mut settings = SessionSettings::new(Url::parse("none://")?);
  settings.camera_index = args.camera;
  settings.resolution = args.resolution;
  settings.window = args.resolution.window_for_width(args.resolution.width);

  let input = InputWrapper::from_url(&settings.input_url()?)?;
  let (width, height) = input.dimensions();
  println!("请求分辨率: {}", args.resolution);
  println!("实际分辨率: {}x{}", width, height);
  if args.probe_only {
    return Ok(());
  }

  let output = OutputWrapper::from_url(&settings.output_url()?)?;
  let flag = RunFlag::running();
  flag.stop_on_ctrlc()?;

  let summary = HandCountTask::new(HandProcessor::default(), flag)
    .with_read_error_limit(Some(0))
    .run_task(input, NoHandsModel, output)?;
  if summary.skipped > 0 {
    anyhow::bail!("摄像头读取失败，预览已结束 ({} 帧)", summary.frames);
  }
  info!("预览结束: {} 帧", summary.frames);
  Ok(())
}
