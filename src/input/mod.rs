// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/input/mod.rs - 输入源模块
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

mod directory_source;
mod image_source;
mod v4l2_source;

use std::path::Path;

use anyhow::Result;

pub use directory_source::DirectorySource;
pub use image_source::ImageSource;
pub use v4l2_source::V4l2Source;

use crate::frame::Frame;

/// 输入源类型
pub enum InputSourceType {
  /// 图片文件
  Image,
  /// 图片序列目录
  Directory,
  /// V4L2 摄像头
  V4l2,
}

/// 输入源 trait
///
/// 帧按序到达；解码失败的帧以 `Err` 形式交给调用方，
/// 由帧循环记日志后跳过。
pub trait InputSource: Iterator<Item = Result<Frame>> {
  /// 获取输入源类型
  fn source_type(&self) -> InputSourceType;

  /// 获取帧宽度
  fn width(&self) -> u32;

  /// 获取帧高度
  fn height(&self) -> u32;

  /// 获取帧率（如果适用）
  fn fps(&self) -> Option<f64>;
}

/// 判断路径是否是支持的图片文件
fn is_image_path(path: &str) -> bool {
  let lower = path.to_lowercase();
  [".jpg", ".jpeg", ".png", ".bmp", ".gif", ".webp"]
    .iter()
    .any(|ext| lower.ends_with(ext))
}

/// 从来源描述创建输入源
///
/// 支持三种来源：
/// - V4L2 摄像头: `/dev/video0` 或 `v4l2:///dev/video0`
/// - 单张图片: `*.jpg`, `*.png` 等
/// - 图片序列目录: 已存在的目录路径，按文件名顺序回放
pub fn create_input_source(source: &str) -> Result<Box<dyn InputSource>> {
  if source.starts_with("/dev/video") || source.starts_with("v4l2://") {
    let device_path = source.trim_start_matches("v4l2://");
    return Ok(Box::new(V4l2Source::open(device_path)?));
  }

  if Path::new(source).is_dir() {
    return Ok(Box::new(DirectorySource::new(source)?));
  }

  if is_image_path(source) {
    return Ok(Box::new(ImageSource::new(source)?));
  }

  anyhow::bail!("无法识别的输入来源: {}", source)
}
