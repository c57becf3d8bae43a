// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/analyzer/mod.rs - 帧分析器接口
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

mod scripted;

use thiserror::Error;

pub use scripted::ScriptedAnalyzer;

use crate::detection::Detection;
use crate::frame::Frame;

#[derive(Error, Debug)]
pub enum AnalyzerError {
  #[error("检测脚本格式错误: {0}")]
  Script(String),
}

/// 帧分析器
///
/// 推理本身由外部视觉库完成，本 crate 只约定能力边界：
/// 给一帧图像，返回零条或多条检测结果，几何均位于该帧的像素空间。
/// 分析失败按「本帧零结果」处理，由调用方记日志并等待下一帧，
/// 不重试、不上抛给用户。
pub trait FrameAnalyzer {
  /// 分析器名称（用于日志）
  fn name(&self) -> &'static str;

  /// 分析一帧，返回检测结果列表
  fn analyze(&mut self, frame: &Frame) -> Result<Vec<Detection>, AnalyzerError>;
}

/// 空分析器：对任何帧都返回零结果
///
/// 未指定检测脚本时的缺省实现，用于单独验证采集、预览与输出链路。
#[derive(Debug, Default)]
pub struct IdleAnalyzer;

impl FrameAnalyzer for IdleAnalyzer {
  fn name(&self) -> &'static str {
    "idle"
  }

  fn analyze(&mut self, _frame: &Frame) -> Result<Vec<Detection>, AnalyzerError> {
    Ok(Vec::new())
  }
}
