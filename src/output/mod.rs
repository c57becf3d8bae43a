// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/output/mod.rs - 输出模块
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

mod directory_record;
mod image_output;

use anyhow::{Context, Result};
use image::RgbImage;

pub use directory_record::DirectoryRecordOutput;
pub use image_output::ImageOutput;

use crate::FromUrl;
use crate::detection::Detection;

/// 输出写入器 trait
///
/// 收到的图像已经是叠加层合成完毕的预览画面；
/// 检测结果列表仅供需要附带记录的实现使用。
pub trait OutputWriter {
  /// 写入一帧
  fn write_frame(&mut self, image: &RgbImage, detections: &[Detection]) -> Result<()>;

  /// 完成写入
  fn finish(&mut self) -> Result<()>;
}

/// 从输出描述创建输出写入器
///
/// 支持两种输出：
/// - 单个图片文件（每帧原地覆写，充当实时预览）: `preview.png`
/// - 记录目录: `folder:///path/to/records?always=true`
pub fn create_output_writer(output: &str) -> Result<Box<dyn OutputWriter>> {
  if output.starts_with("folder://") {
    let url = url::Url::parse(output).with_context(|| format!("无法解析输出地址: {}", output))?;
    return Ok(Box::new(DirectoryRecordOutput::from_url(&url)?));
  }

  let lower = output.to_lowercase();
  if [".jpg", ".jpeg", ".png", ".bmp"]
    .iter()
    .any(|ext| lower.ends_with(ext))
  {
    return Ok(Box::new(ImageOutput::new(output)));
  }

  anyhow::bail!("无法识别的输出目标: {}", output)
}
