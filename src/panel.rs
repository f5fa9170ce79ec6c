// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/panel.rs - 采集控制面板
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

//! 控制面板只负责状态：开始/停止、分辨率、窗口宽度与日志开关。
//! 采集循环在独立线程中运行，与面板之间只共享 [`RunFlag`]。

use std::str::FromStr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{
  ConfigError, DEFAULT_WINDOW_WIDTH, Resolution, SessionSettings, clamp_window_width,
};
use crate::task::RunFlag;

/// 在工作线程中运行一次会话
pub type SessionLauncher = Arc<dyn Fn(SessionSettings, RunFlag) -> anyhow::Result<()> + Send + Sync>;

pub const STATUS_RUNNING: &str = "Status: Running";
pub const STATUS_STOPPED: &str = "Status: Stopped";

#[derive(Error, Debug)]
pub enum PanelError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("无法启动采集线程: {0}")]
  Spawn(#[from] std::io::Error),
  #[error("未知命令: {0}")]
  UnknownCommand(String),
}

pub struct ControlPanel {
  status: String,
  resolution: Resolution,
  window_width: u32,
  log_enabled: bool,
  base: SessionSettings,
  flag: RunFlag,
  worker: Option<JoinHandle<()>>,
  launcher: SessionLauncher,
}

impl ControlPanel {
  pub fn new(base: SessionSettings, launcher: SessionLauncher) -> Self {
    Self {
      status: STATUS_STOPPED.to_string(),
      resolution: Resolution::default(),
      window_width: DEFAULT_WINDOW_WIDTH,
      log_enabled: base.log_enabled,
      base,
      flag: RunFlag::default(),
      worker: None,
      launcher,
    }
  }

  /// 工作线程自行结束后显示为已停止
  pub fn status(&self) -> &str {
    if self.status == STATUS_RUNNING && !self.is_running() {
      STATUS_STOPPED
    } else {
      &self.status
    }
  }

  pub fn is_running(&self) -> bool {
    self.flag.is_running()
  }

  pub fn resolution(&self) -> Resolution {
    self.resolution
  }

  pub fn window_width(&self) -> u32 {
    self.window_width
  }

  pub fn log_enabled(&self) -> bool {
    self.log_enabled
  }

  /// 当前选项对应的会话参数
  pub fn settings(&self) -> SessionSettings {
    SessionSettings {
      resolution: self.resolution,
      window: self.resolution.window_for_width(self.window_width),
      log_enabled: self.log_enabled,
      ..self.base.clone()
    }
  }

  /// 启动采集线程，已在运行时不做任何事并返回 false
  pub fn start(&mut self) -> Result<bool, PanelError> {
    if self.flag.is_running() {
      return Ok(false);
    }
    // 上一个会话已收到停止请求，等待其释放摄像头与窗口
    self.join();

    let settings = self.settings();
    self.flag = RunFlag::running();
    let flag = self.flag.clone();
    let launcher = self.launcher.clone();
    let spawned = thread::Builder::new()
      .name("hand-capture".to_string())
      .spawn(move || {
        if let Err(e) = launcher(settings, flag.clone()) {
          error!("采集会话异常结束: {:#}", e);
        }
        flag.stop();
      });

    match spawned {
      Ok(handle) => {
        self.worker = Some(handle);
        self.status = STATUS_RUNNING.to_string();
        info!("采集已启动");
        Ok(true)
      }
      Err(e) => {
        self.flag.stop();
        Err(PanelError::Spawn(e))
      }
    }
  }

  /// 请求采集线程在下一帧退出
  pub fn stop(&mut self) {
    self.flag.stop();
    self.status = STATUS_STOPPED.to_string();
    info!("采集已停止");
  }

  pub fn select_resolution(&mut self, resolution: Resolution) -> Result<(), PanelError> {
    if !resolution.is_supported() {
      return Err(ConfigError::UnsupportedResolution(resolution).into());
    }
    self.resolution = resolution;
    Ok(())
  }

  /// 设置窗口宽度（滑块），返回限制后的值
  pub fn set_window_width(&mut self, width: u32) -> u32 {
    self.window_width = clamp_window_width(width);
    self.status = format!("Window size set to {}px", self.window_width);
    self.window_width
  }

  pub fn set_log_enabled(&mut self, enabled: bool) {
    self.log_enabled = enabled;
  }

  /// 执行一条面板命令
  pub fn apply(&mut self, command: PanelCommand) -> Result<(), PanelError> {
    match command {
      PanelCommand::Start => {
        if !self.start()? {
          warn!("采集已在运行");
        }
      }
      PanelCommand::Stop => self.stop(),
      PanelCommand::Resolution(resolution) => self.select_resolution(resolution)?,
      PanelCommand::WindowWidth(width) => {
        self.set_window_width(width);
      }
      PanelCommand::Log(enabled) => self.set_log_enabled(enabled),
      PanelCommand::Status | PanelCommand::Quit => {}
    }
    Ok(())
  }

  /// 等待采集线程结束
  pub fn join(&mut self) {
    if let Some(handle) = self.worker.take()
      && handle.join().is_err()
    {
      error!("采集线程异常退出");
    }
  }
}

impl Drop for ControlPanel {
  fn drop(&mut self) {
    self.flag.stop();
    self.join();
  }
}

/// 终端控制面板命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
  Start,
  Stop,
  Resolution(Resolution),
  WindowWidth(u32),
  Log(bool),
  Status,
  Quit,
}

impl FromStr for PanelCommand {
  type Err = PanelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let unknown = || PanelError::UnknownCommand(s.trim().to_string());
    let mut words = s.split_whitespace();
    let command = match (words.next(), words.next()) {
      (Some("start"), None) => PanelCommand::Start,
      (Some("stop"), None) => PanelCommand::Stop,
      (Some("status"), None) => PanelCommand::Status,
      (Some("quit" | "exit"), None) => PanelCommand::Quit,
      (Some("res"), Some(value)) => PanelCommand::Resolution(value.parse()?),
      (Some("width"), Some(value)) => {
        PanelCommand::WindowWidth(value.parse().map_err(|_| unknown())?)
      }
      (Some("log"), Some("on")) => PanelCommand::Log(true),
      (Some("log"), Some("off")) => PanelCommand::Log(false),
      _ => return Err(unknown()),
    };

    if words.next().is_some() {
      return Err(unknown());
    }
    Ok(command)
  }
}
