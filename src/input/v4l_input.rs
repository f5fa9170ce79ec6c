// 该文件是 Shouzhi （手指计数） 项目的一部分。
// src/input/v4l_input.rs - V4L 摄像头输入
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::{FromUrl, FromUrlWithScheme, frame::RgbFrame};

use image::ImageFormat;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;
use v4l::{
  Device, FourCC,
  buffer::Type,
  io::{mmap::Stream, traits::CaptureStream},
  video::Capture,
};

#[derive(Error, Debug)]
pub enum V4lInputError {
  #[error("URI schema mismatch")]
  SchemaMismatch,
  #[error("I/O error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Invalid device: {0}")]
  InvalidDevice(String),
  #[error("Unsupported pixel format: {0}")]
  UnsupportedPixelFormat(String),
  #[error("Frame decode error: {0}")]
  DecodeError(#[from] image::ImageError),
  #[error("Captured buffer size mismatch: {0} bytes")]
  BufferSizeMismatch(usize),
}

const MJPG: [u8; 4] = *b"MJPG";
const YUYV: [u8; 4] = *b"YUYV";
const BUFFER_COUNT: u32 = 4;

/// V4L2 摄像头，请求的分辨率不一定被驱动接受
pub struct V4lInput {
  stream: Stream<'static>,
  width: u32,
  height: u32,
  fourcc: FourCC,
  frame_index: u64,
}

impl FromUrlWithScheme for V4lInput {
  const SCHEME: &'static str = "v4l";
}

impl FromUrl for V4lInput {
  type Error = V4lInputError;

  /// 支持 `v4l:///dev/video0?width=1280&height=720` 与 `camera://0?width=1280&height=720`
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    let device = match url.scheme() {
      Self::SCHEME => {
        let path = if url.path().is_empty() || url.path() == "/" {
          "/dev/video0"
        } else {
          url.path()
        };
        Device::with_path(path)?
      }
      Self::CAMERA_SCHEME => {
        let index = url
          .host_str()
          .unwrap_or("0")
          .parse::<usize>()
          .map_err(|e| V4lInputError::InvalidDevice(e.to_string()))?;
        Device::new(index)?
      }
      scheme => {
        error!(
          "URI scheme mismatch: expected '{}' or '{}', found '{}'",
          Self::SCHEME,
          Self::CAMERA_SCHEME,
          scheme
        );
        return Err(V4lInputError::SchemaMismatch);
      }
    };

    let dimension = |key: &str| {
      url
        .query_pairs()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse::<u32>().ok())
    };
    let request = dimension("width").zip(dimension("height"));

    Self::open(device, request)
  }
}

impl V4lInput {
  pub const CAMERA_SCHEME: &'static str = "camera";

  pub fn open(device: Device, request: Option<(u32, u32)>) -> Result<Self, V4lInputError> {
    let mut format = device.format()?;
    if let Some((width, height)) = request {
      format.width = width;
      format.height = height;
    }
    format.fourcc = FourCC::new(&MJPG);

    let mut format = device.set_format(&format)?;
    if format.fourcc.repr != MJPG {
      format.fourcc = FourCC::new(&YUYV);
      format = device.set_format(&format)?;
    }
    if format.fourcc.repr != MJPG && format.fourcc.repr != YUYV {
      return Err(V4lInputError::UnsupportedPixelFormat(
        format.fourcc.to_string(),
      ));
    }

    info!(
      "Camera format: {}x{} {}",
      format.width, format.height, format.fourcc
    );
    if let Some((width, height)) = request
      && (width, height) != (format.width, format.height)
    {
      warn!(
        "Requested {}x{}, driver negotiated {}x{}",
        width, height, format.width, format.height
      );
    }

    let stream = Stream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)?;

    Ok(V4lInput {
      stream,
      width: format.width,
      height: format.height,
      fourcc: format.fourcc,
      frame_index: 0,
    })
  }

  pub fn dimensions(&self) -> (u32, u32) {
    (self.width, self.height)
  }
}

fn decode_frame(
  index: u64,
  fourcc: FourCC,
  data: &[u8],
  width: u32,
  height: u32,
) -> Result<RgbFrame, V4lInputError> {
  if fourcc.repr == MJPG {
    let image = image::load_from_memory_with_format(data, ImageFormat::Jpeg)?;
    Ok(RgbFrame::new(index, image.to_rgb8()))
  } else {
    RgbFrame::from_yuyv(index, data, width, height)
      .ok_or(V4lInputError::BufferSizeMismatch(data.len()))
  }
}

impl Iterator for V4lInput {
  type Item = Result<RgbFrame, V4lInputError>;

  fn next(&mut self) -> Option<Self::Item> {
    let index = self.frame_index;
    self.frame_index += 1;
    let (fourcc, width, height) = (self.fourcc, self.width, self.height);

    let frame = match self.stream.next() {
      Ok((buf, meta)) => {
        let used = (meta.bytesused as usize).min(buf.len());
        let used = if used == 0 { buf.len() } else { used };
        decode_frame(index, fourcc, &buf[..used], width, height)
      }
      Err(e) => Err(V4lInputError::from(e)),
    };

    Some(frame)
  }
}
