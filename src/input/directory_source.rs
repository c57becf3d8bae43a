// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/input/directory_source.rs - 图片序列输入源
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

use std::path::PathBuf;

use anyhow::{Context, Result};
use image::ImageReader;

use super::{InputSource, InputSourceType, is_image_path};
use crate::frame::Frame;

/// 每帧的名义间隔，回放时按 30fps 折算时间戳
const FRAME_INTERVAL_MS: u64 = 33;

/// 图片序列输入源
///
/// 把目录下的图片文件按文件名顺序当作连续帧回放，
/// 用于没有摄像头的环境下复现一段采集过程。
/// 各帧分辨率允许不同：检测结果的坐标空间始终以当前帧为准。
pub struct DirectorySource {
  files: Vec<PathBuf>,
  position: usize,
  width: u32,
  height: u32,
}

impl DirectorySource {
  /// 创建一个新的图片序列输入源
  pub fn new(directory: &str) -> Result<Self> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
      .with_context(|| format!("无法读取目录: {}", directory))?
      .filter_map(|entry| entry.ok().map(|e| e.path()))
      .filter(|path| {
        path
          .to_str()
          .map(is_image_path)
          .unwrap_or(false)
      })
      .collect();
    files.sort();

    if files.is_empty() {
      anyhow::bail!("目录中没有可用的图片文件: {}", directory);
    }

    // 先解码首帧以确定名义分辨率
    let first = ImageReader::open(&files[0])
      .with_context(|| format!("无法打开图片文件: {}", files[0].display()))?
      .decode()
      .with_context(|| format!("无法解码图片文件: {}", files[0].display()))?;

    Ok(Self {
      width: first.width(),
      height: first.height(),
      files,
      position: 0,
    })
  }
}

impl Iterator for DirectorySource {
  type Item = Result<Frame>;

  fn next(&mut self) -> Option<Self::Item> {
    let path = self.files.get(self.position)?.clone();
    let index = self.position as u64;
    self.position += 1;

    let decoded = ImageReader::open(&path)
      .with_context(|| format!("无法打开图片文件: {}", path.display()))
      .and_then(|reader| {
        reader
          .decode()
          .with_context(|| format!("无法解码图片文件: {}", path.display()))
      });

    Some(decoded.map(|img| Frame {
      image: img.to_rgb8(),
      index,
      timestamp_ms: index * FRAME_INTERVAL_MS,
    }))
  }
}

impl InputSource for DirectorySource {
  fn source_type(&self) -> InputSourceType {
    InputSourceType::Directory
  }

  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }

  fn fps(&self) -> Option<f64> {
    Some(1000.0 / FRAME_INTERVAL_MS as f64)
  }
}
