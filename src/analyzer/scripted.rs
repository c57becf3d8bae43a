// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/analyzer/scripted.rs - 脚本化分析器
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

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use super::{AnalyzerError, FrameAnalyzer};
use crate::detection::{BoundingBox, Detection};
use crate::frame::Frame;
use crate::geometry::PointF;

/// 脚本化分析器
///
/// 从 JSON 脚本按帧回放检测结果，充当外部推理库的替身，
/// 用于演示与测试整条「采集 → 分析 → 馈送 → 叠加」链路。
/// 脚本放完最后一帧后从头循环，模拟持续出结果的真实分析器。
///
/// 脚本格式：顶层数组，每个元素为一帧，形如
/// `{ "detections": [ { "kind": "object", "bbox": [x, y, w, h], ... } ] }`。
#[derive(Debug)]
pub struct ScriptedAnalyzer {
  frames: Vec<Vec<Detection>>,
  cursor: usize,
}

impl ScriptedAnalyzer {
  /// 直接由各帧的检测结果构造
  pub fn from_frames(frames: Vec<Vec<Detection>>) -> Self {
    Self { frames, cursor: 0 }
  }

  /// 从脚本文件加载
  pub fn from_path(path: &Path) -> anyhow::Result<Self> {
    let text = std::fs::read_to_string(path)
      .with_context(|| format!("无法读取检测脚本: {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
      .with_context(|| format!("无法解析检测脚本: {}", path.display()))?;
    Ok(Self::from_json(&value)?)
  }

  /// 从已解析的 JSON 值构造
  pub fn from_json(value: &Value) -> Result<Self, AnalyzerError> {
    let entries = value
      .as_array()
      .ok_or_else(|| AnalyzerError::Script("顶层应为帧数组".to_string()))?;

    let mut frames = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
      let detections = entry
        .get("detections")
        .and_then(Value::as_array)
        .ok_or_else(|| AnalyzerError::Script(format!("第 {} 帧缺少 detections 数组", index)))?;

      let mut parsed = Vec::with_capacity(detections.len());
      for det in detections {
        parsed.push(parse_detection(det)?);
      }
      frames.push(parsed);
    }

    Ok(Self::from_frames(frames))
  }
}

impl FrameAnalyzer for ScriptedAnalyzer {
  fn name(&self) -> &'static str {
    "scripted"
  }

  fn analyze(&mut self, _frame: &Frame) -> Result<Vec<Detection>, AnalyzerError> {
    if self.frames.is_empty() {
      return Ok(Vec::new());
    }

    let result = self.frames[self.cursor].clone();
    self.cursor = (self.cursor + 1) % self.frames.len();
    Ok(result)
  }
}

fn parse_detection(value: &Value) -> Result<Detection, AnalyzerError> {
  let kind = value
    .get("kind")
    .and_then(Value::as_str)
    .ok_or_else(|| AnalyzerError::Script("检测条目缺少 kind 字段".to_string()))?;

  match kind {
    "object" => Ok(Detection::Object {
      bbox: parse_bbox(value)?,
      label: value
        .get("label")
        .and_then(Value::as_str)
        .map(str::to_string),
      confidence: value
        .get("confidence")
        .and_then(Value::as_f64)
        .map(|v| v as f32),
    }),
    "face_mesh" => Ok(Detection::FaceMesh {
      bbox: parse_bbox(value)?,
      landmarks: parse_points(value.get("landmarks"))?,
      triangles: parse_triangles(value.get("triangles"))?,
    }),
    "text" => Ok(Detection::Text {
      text: value
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string(),
    }),
    "barcode" => Ok(Detection::Barcode {
      bbox: parse_bbox(value)?,
      value: value
        .get("value")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string(),
    }),
    "label" => Ok(Detection::Label {
      label: value
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string(),
      confidence: value
        .get("confidence")
        .and_then(Value::as_f64)
        .unwrap_or_default() as f32,
    }),
    other => Err(AnalyzerError::Script(format!("未知的检测类别: {}", other))),
  }
}

fn parse_bbox(value: &Value) -> Result<BoundingBox, AnalyzerError> {
  let parts = value
    .get("bbox")
    .and_then(Value::as_array)
    .ok_or_else(|| AnalyzerError::Script("缺少 bbox 字段".to_string()))?;

  if parts.len() != 4 {
    return Err(AnalyzerError::Script(format!(
      "bbox 应为 [x, y, w, h]，实际 {} 个分量",
      parts.len()
    )));
  }

  let mut nums = [0.0f32; 4];
  for (i, part) in parts.iter().enumerate() {
    nums[i] = part
      .as_f64()
      .ok_or_else(|| AnalyzerError::Script("bbox 分量必须是数字".to_string()))? as f32;
  }

  Ok(BoundingBox::new(nums[0], nums[1], nums[2], nums[3]))
}

fn parse_point(value: &Value) -> Result<PointF, AnalyzerError> {
  let parts = value
    .as_array()
    .filter(|a| a.len() == 2)
    .ok_or_else(|| AnalyzerError::Script("点应为 [x, y]".to_string()))?;

  let x = parts[0]
    .as_f64()
    .ok_or_else(|| AnalyzerError::Script("点分量必须是数字".to_string()))?;
  let y = parts[1]
    .as_f64()
    .ok_or_else(|| AnalyzerError::Script("点分量必须是数字".to_string()))?;

  Ok(PointF::new(x as f32, y as f32))
}

fn parse_points(value: Option<&Value>) -> Result<Vec<PointF>, AnalyzerError> {
  let Some(list) = value.and_then(Value::as_array) else {
    return Ok(Vec::new());
  };

  list.iter().map(parse_point).collect()
}

fn parse_triangles(value: Option<&Value>) -> Result<Vec<Vec<PointF>>, AnalyzerError> {
  let Some(list) = value.and_then(Value::as_array) else {
    return Ok(Vec::new());
  };

  // 顶点数不在这里校验：畸形三角形由绘制层按单个形状丢弃
  list
    .iter()
    .map(|t| {
      t.as_array()
        .ok_or_else(|| AnalyzerError::Script("三角形应为顶点数组".to_string()))?
        .iter()
        .map(parse_point)
        .collect()
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn frame() -> Frame {
    Frame {
      image: image::RgbImage::new(4, 4),
      index: 0,
      timestamp_ms: 0,
    }
  }

  #[test]
  fn parses_object_script_and_replays_in_order() {
    let script = json!([
      { "detections": [
        { "kind": "object", "bbox": [100.0, 100.0, 50.0, 80.0], "label": "cat", "confidence": 0.9 }
      ] },
      { "detections": [] }
    ]);

    let mut analyzer = ScriptedAnalyzer::from_json(&script).expect("脚本合法");
    let f = frame();

    let first = analyzer.analyze(&f).expect("分析成功");
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind(), "object");

    let second = analyzer.analyze(&f).expect("分析成功");
    assert!(second.is_empty());

    // 放完最后一帧后从头循环
    let third = analyzer.analyze(&f).expect("分析成功");
    assert_eq!(third, first);
  }

  #[test]
  fn parses_face_mesh_geometry() {
    let script = json!([
      { "detections": [
        { "kind": "face_mesh",
          "bbox": [10.0, 10.0, 20.0, 20.0],
          "landmarks": [[12.0, 12.0], [18.0, 14.0]],
          "triangles": [[[10.0, 10.0], [20.0, 10.0], [15.0, 20.0]]] }
      ] }
    ]);

    let mut analyzer = ScriptedAnalyzer::from_json(&script).expect("脚本合法");
    let result = analyzer.analyze(&frame()).expect("分析成功");

    let Detection::FaceMesh {
      landmarks,
      triangles,
      ..
    } = &result[0]
    else {
      panic!("应为人脸网格结果");
    };
    assert_eq!(landmarks.len(), 2);
    assert_eq!(triangles.len(), 1);
    assert_eq!(triangles[0].len(), 3);
  }

  #[test]
  fn rejects_unknown_kind() {
    let script = json!([
      { "detections": [ { "kind": "pose" } ] }
    ]);

    let err = ScriptedAnalyzer::from_json(&script);
    assert!(matches!(err, Err(AnalyzerError::Script(_))));
  }

  #[test]
  fn empty_script_yields_zero_results() {
    let mut analyzer = ScriptedAnalyzer::from_frames(Vec::new());
    assert!(analyzer.analyze(&frame()).expect("分析成功").is_empty());
  }
}
