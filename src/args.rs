// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/args.rs - 项目参数配置
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

use anyhow::Result;
use clap::Parser;

use guanlan::geometry::Dimensions;
use guanlan::screen::Route;

/// Guanlan 项目参数配置
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测界面路由
  #[arg(long, value_enum, value_name = "ROUTE")]
  pub route: Route,

  /// 输入来源（V4L2 设备、图片文件或图片序列目录）
  /// 支持格式:
  /// - V4L2: /dev/video0 或 v4l2:///dev/video0
  /// - 图片: *.jpg, *.jpeg, *.png, *.bmp, *.gif, *.webp
  /// - 目录: 按文件名顺序回放其中的图片
  #[arg(long, value_name = "SOURCE")]
  pub input: String,

  /// 输出目标（预览图片路径或 folder:// 记录目录）
  #[arg(long, value_name = "OUTPUT")]
  pub output: String,

  /// 检测脚本（JSON），充当外部推理库；缺省时分析器不产生结果
  #[arg(long, value_name = "FILE")]
  pub script: Option<PathBuf>,

  /// 视图（屏幕）尺寸，格式 WxH
  #[arg(long, default_value = "1080x1920", value_name = "SIZE")]
  pub view_size: String,

  /// 最大处理帧数（0 表示无限制）
  #[arg(long, default_value = "0", value_name = "COUNT")]
  pub max_frames: u64,
}

/// 解析 `WxH` 形式的视图尺寸
pub fn parse_view_size(text: &str) -> Result<Dimensions> {
  let (w, h) = text
    .split_once(['x', 'X'])
    .ok_or_else(|| anyhow::anyhow!("视图尺寸格式应为 WxH: {}", text))?;

  let width: u32 = w.trim().parse()?;
  let height: u32 = h.trim().parse()?;
  if width == 0 || height == 0 {
    anyhow::bail!("视图尺寸不能为零: {}", text);
  }

  Ok(Dimensions::new(width, height))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_view_size() {
    let dims = parse_view_size("1080x2280").expect("格式合法");
    assert_eq!(dims, Dimensions::new(1080, 2280));
  }

  #[test]
  fn rejects_malformed_view_size() {
    assert!(parse_view_size("1080").is_err());
    assert!(parse_view_size("0x100").is_err());
    assert!(parse_view_size("wxh").is_err());
  }
}
