// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/args.rs - 项目参数配置
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Shouzhi 手指计数参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 手部关键点模型
  /// 支持格式:
  /// - 关键点回放: replay:///path/to/hands.jsonl[?loop]
  /// - 仅预览: none://
  #[arg(long, value_name = "MODEL")]
  pub model: Url,

  /// 输入来源
  /// 支持格式:
  /// - 摄像头: camera://0?width=1920&height=1080
  /// - V4L2: v4l:///dev/video0?width=1280&height=720
  /// - 图片: image:///path/to/hand.png
  #[arg(long, value_name = "SOURCE", default_value = "camera://0?width=1920&height=1080")]
  pub input: Url,

  /// 输出
  /// 支持格式:
  /// - 窗口: window://?width=1600&height=900
  /// - 图片: image:///path/to/out.png
  /// - 目录: folder:///path/to/dir[?always][&record]
  #[arg(long, value_name = "OUTPUT", default_value = "window://?width=1600&height=900")]
  pub output: Url,

  /// 最大处理帧数（不指定表示无限制）
  #[arg(long, value_name = "FRAME_NUMBER")]
  pub frame_number: Option<usize>,

  /// 计数日志文件（JSON Lines），不指定则不记录
  #[arg(long, value_name = "FILE")]
  pub log: Option<PathBuf>,

  /// 不绘制关键点骨架
  #[arg(long)]
  pub no_landmarks: bool,
}
