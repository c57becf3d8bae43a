// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/detection.rs - 检测结果定义
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

use serde_json::json;

use crate::geometry::{PointF, SizeF};

/// 帧空间中的边界框（左上角 + 尺寸）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  pub top_left: PointF,
  pub size: SizeF,
}

impl BoundingBox {
  pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      top_left: PointF::new(x, y),
      size: SizeF::new(width, height),
    }
  }
}

/// 单条检测结果
///
/// 每个变体只携带自身需要的几何与语义载荷。几何均位于分析帧的
/// 像素空间；标签、置信度等载荷不参与绘制判断，仅用于记录与日志。
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
  /// 目标检测：仅边界框
  Object {
    bbox: BoundingBox,
    label: Option<String>,
    confidence: Option<f32>,
  },
  /// 人脸网格：边界框 + 关键点 + 三角网格
  ///
  /// 三角形以顶点列表表达；合法的三角形恰有 3 个顶点，
  /// 畸形数据在绘制阶段被丢弃而不是在此处拒绝。
  FaceMesh {
    bbox: BoundingBox,
    landmarks: Vec<PointF>,
    triangles: Vec<Vec<PointF>>,
  },
  /// 文本识别：自由文本
  Text { text: String },
  /// 条码扫描：边界框 + 解码值
  Barcode { bbox: BoundingBox, value: String },
  /// 图像标注：标签 + 置信度，无几何
  Label { label: String, confidence: f32 },
}

impl Detection {
  /// 变体名称（记录附带文件里的 kind 字段）
  pub fn kind(&self) -> &'static str {
    match self {
      Detection::Object { .. } => "object",
      Detection::FaceMesh { .. } => "face_mesh",
      Detection::Text { .. } => "text",
      Detection::Barcode { .. } => "barcode",
      Detection::Label { .. } => "label",
    }
  }

  /// 编码为 JSON（记录输出的附带文件格式）
  pub fn to_json(&self) -> serde_json::Value {
    match self {
      Detection::Object {
        bbox,
        label,
        confidence,
      } => json!({
        "kind": self.kind(),
        "bbox": bbox_json(bbox),
        "label": label,
        "confidence": confidence,
      }),
      Detection::FaceMesh {
        bbox,
        landmarks,
        triangles,
      } => json!({
        "kind": self.kind(),
        "bbox": bbox_json(bbox),
        "landmarks": landmarks.iter().map(point_json).collect::<Vec<_>>(),
        "triangles": triangles
          .iter()
          .map(|t| t.iter().map(point_json).collect::<Vec<_>>())
          .collect::<Vec<_>>(),
      }),
      Detection::Text { text } => json!({
        "kind": self.kind(),
        "text": text,
      }),
      Detection::Barcode { bbox, value } => json!({
        "kind": self.kind(),
        "bbox": bbox_json(bbox),
        "value": value,
      }),
      Detection::Label { label, confidence } => json!({
        "kind": self.kind(),
        "label": label,
        "confidence": confidence,
      }),
    }
  }
}

fn bbox_json(bbox: &BoundingBox) -> serde_json::Value {
  json!([
    bbox.top_left.x,
    bbox.top_left.y,
    bbox.size.width,
    bbox.size.height
  ])
}

fn point_json(p: &PointF) -> serde_json::Value {
  json!([p.x, p.y])
}
