// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/bin/hand_panel.rs - 终端控制面板
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use shouzhi::{
  config::{DEFAULT_CAMERA_INDEX, DEFAULT_LOG_FILE, Resolution, SessionSettings},
  panel::{ControlPanel, PanelCommand, SessionLauncher},
  task::{RunFlag, run_session},
};

/// 手指计数控制面板
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 手部关键点模型
  #[arg(long, value_name = "MODEL", default_value = "none://")]
  pub model: Url,
  /// 摄像头编号
  #[arg(long, value_name = "INDEX", default_value_t = DEFAULT_CAMERA_INDEX)]
  pub camera: usize,
  /// 计数日志文件
  #[arg(long, value_name = "FILE", default_value = DEFAULT_LOG_FILE)]
  pub log_file: PathBuf,
  /// 不绘制关键点骨架
  #[arg(long)]
  pub no_landmarks: bool,
}

const HELP: &str = "commands: start | stop | res <WxH> | width <px> | log on|off | status | quit";

fn print_status(panel: &ControlPanel) {
  let settings = panel.settings();
  println!(
    "{} | resolution {} | window {} | log {}",
    panel.status(),
    settings.resolution,
    settings.window,
    if settings.log_enabled { "on" } else { "off" }
  );
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();

  let mut base = SessionSettings::new(args.model);
  base.camera_index = args.camera;
  base.log_file = args.log_file;
  base.show_landmarks = !args.no_landmarks;

  let launcher: SessionLauncher = Arc::new(|settings: SessionSettings, flag: RunFlag| -> Result<()> {
    run_session(&settings, flag).map(|summary| {
      info!("会话结束: {} 帧, {} 条计数", summary.frames, summary.readings);
    })
  });
  let mut panel = ControlPanel::new(base, launcher);

  println!("手指计数控制面板");
  println!("==================");
  let choices = Resolution::SUPPORTED
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(", ");
  println!("可选分辨率: {}", choices);
  println!("{}", HELP);
  print_status(&panel);

  let stdin = std::io::stdin();
  let mut stdout = std::io::stdout();
  for line in stdin.lock().lines() {
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }

    match line.parse::<PanelCommand>() {
      Ok(PanelCommand::Quit) => break,
      Ok(command) => {
        if let Err(e) = panel.apply(command) {
          warn!("{}", e);
        }
        print_status(&panel);
      }
      Err(e) => {
        warn!("{}", e);
        println!("{}", HELP);
      }
    }
    stdout.flush()?;
  }

  panel.stop();
  panel.join();
  Ok(())
}
