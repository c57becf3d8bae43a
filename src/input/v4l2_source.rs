// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/input/v4l2_source.rs - V4L2 摄像头输入源
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

use std::pin::Pin;
use std::time::Instant;

use anyhow::{Context, Result};
use image::RgbImage;
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

use super::{InputSource, InputSourceType};
use crate::frame::Frame;

/// 向驱动请求的采集分辨率；驱动可能协商出别的值，以返回格式为准
const REQUEST_WIDTH: u32 = 640;
const REQUEST_HEIGHT: u32 = 480;
const BUFFER_COUNT: u32 = 4;

/// V4L2 摄像头输入源
///
/// v4l 库的 Stream 需要持有对 Device 的引用，这里用 Pin<Box> 固定
/// Device 的内存位置，使 Stream 可以安全地与它共存于同一结构体。
pub struct V4l2Source {
  /// V4L2 设备（Pin<Box> 固定内存位置）
  device: Pin<Box<Device>>,
  /// 捕获流（生命周期与 device 绑定）
  stream: Option<Stream<'static>>,
  /// 帧索引
  frame_index: u64,
  /// 协商后的帧宽度
  width: u32,
  /// 协商后的帧高度
  height: u32,
  /// 打开设备的时刻，用于折算时间戳
  opened_at: Instant,
}

impl V4l2Source {
  /// 打开指定设备并开始采集
  pub fn open(device_path: &str) -> Result<Self> {
    let device = Box::pin(
      Device::with_path(device_path).with_context(|| format!("无法打开设备: {}", device_path))?,
    );

    let mut format = device.format()?;
    format.width = REQUEST_WIDTH;
    format.height = REQUEST_HEIGHT;
    format.fourcc = FourCC::new(b"YUYV");
    let format = device.set_format(&format)?;

    let mut source = Self {
      width: format.width,
      height: format.height,
      device,
      stream: None,
      frame_index: 0,
      opened_at: Instant::now(),
    };

    // SAFETY: 将设备引用的生命周期延长到 'static 是安全的，因为：
    // 1. device 被 Pin<Box> 固定在堆上，不会移动；
    // 2. stream 与 device 存放在同一结构体中；
    // 3. Drop 里先取走 stream，保证它在 device 之前析构。
    let device_ref: &Device = &source.device;
    let stream = unsafe {
      let device_static: &'static Device = std::mem::transmute(device_ref);
      Stream::with_buffers(device_static, Type::VideoCapture, BUFFER_COUNT)
        .context("无法创建捕获流")?
    };

    source.stream = Some(stream);
    Ok(source)
  }

  /// 将 YUYV 缓冲转换为 RGB 字节序列
  fn yuyv_to_rgb(yuyv: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(yuyv.len() / 2 * 3);

    for chunk in yuyv.chunks_exact(4) {
      let u = chunk[1] as f32 - 128.0;
      let v = chunk[3] as f32 - 128.0;

      // 每组 YUYV 携带两个共享色度的像素
      for &y in &[chunk[0], chunk[2]] {
        let y = y as f32;
        let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
        let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
        let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
        rgb.extend_from_slice(&[r, g, b]);
      }
    }

    rgb
  }
}

impl Drop for V4l2Source {
  fn drop(&mut self) {
    // 确保 stream 在 device 之前析构
    self.stream.take();
  }
}

impl Iterator for V4l2Source {
  type Item = Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    let stream = self.stream.as_mut()?;

    match stream.next() {
      Ok((buffer, _meta)) => {
        let rgb_data = Self::yuyv_to_rgb(buffer);

        let Some(image) = RgbImage::from_raw(self.width, self.height, rgb_data) else {
          return Some(Err(anyhow::anyhow!("帧数据长度与协商分辨率不符")));
        };

        let frame = Frame {
          image,
          index: self.frame_index,
          timestamp_ms: self.opened_at.elapsed().as_millis() as u64,
        };

        self.frame_index += 1;
        Some(Ok(frame))
      }
      Err(e) => Some(Err(anyhow::anyhow!("无法捕获帧: {}", e))),
    }
  }
}

impl InputSource for V4l2Source {
  fn source_type(&self) -> InputSourceType {
    InputSourceType::V4l2
  }

  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }

  fn fps(&self) -> Option<f64> {
    // 驱动未必上报帧率，按常见摄像头缺省值处理
    Some(30.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yuyv_conversion_handles_gray_values() {
    // 中性色度（128）时 YUYV 退化为灰度
    let yuyv = [64u8, 128, 192, 128];
    let rgb = V4l2Source::yuyv_to_rgb(&yuyv);

    assert_eq!(rgb.len(), 6);
    assert_eq!(&rgb[0..3], &[64, 64, 64]);
    assert_eq!(&rgb[3..6], &[192, 192, 192]);
  }
}
