// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/screen/face_mesh.rs - 人脸网格检测界面
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

use image::RgbImage;
use tracing::warn;

use super::{Route, Screen, analyze_or_empty};
use crate::analyzer::FrameAnalyzer;
use crate::detection::Detection;
use crate::feed::{AnalyzerBinding, Delivery, DetectionFeed};
use crate::frame::Frame;
use crate::geometry::{CoordinateMapper, Dimensions, PointF};
use crate::overlay;

/// 人脸网格检测界面
///
/// 每张脸画三层叠加：边界框、全部关键点、三角线框。
pub struct FaceMeshScreen {
  analyzer: Box<dyn FrameAnalyzer>,
  feed: DetectionFeed,
  binding: AnalyzerBinding,
}

impl FaceMeshScreen {
  pub fn new(analyzer: Box<dyn FrameAnalyzer>) -> Self {
    let feed = DetectionFeed::new();
    let binding = feed.binding();
    Self {
      analyzer,
      feed,
      binding,
    }
  }
}

impl Screen for FaceMeshScreen {
  fn route(&self) -> Route {
    Route::FaceMeshDetection
  }

  fn process_frame(&mut self, frame: &Frame) {
    let detections = analyze_or_empty(self.analyzer.as_mut(), frame);
    if self.binding.deliver(detections, frame.dimensions()) == Delivery::Unbound {
      warn!("人脸网格结果投递到已销毁的馈送单元，已忽略");
    }
  }

  fn redraw(&self, canvas: &mut RgbImage) {
    let Some(snapshot) = self.feed.snapshot() else {
      return;
    };
    let view = Dimensions::new(canvas.width(), canvas.height());
    let Ok(mapper) = CoordinateMapper::new(snapshot.frame, view) else {
      return;
    };

    for detection in &snapshot.detections {
      let Detection::FaceMesh {
        bbox,
        landmarks,
        triangles,
      } = detection
      else {
        continue;
      };

      let top_left = mapper.map_point(bbox.top_left);
      let size = mapper.map_size(bbox.size);
      overlay::draw_bounding_box(canvas, top_left, size, &overlay::MESH_BOX);

      for landmark in landmarks {
        let point = mapper.map_point(*landmark);
        overlay::draw_landmark(canvas, point, overlay::LANDMARK_COLOR, overlay::LANDMARK_RADIUS);
      }

      for triangle in triangles {
        let mapped: Vec<PointF> = triangle.iter().map(|p| mapper.map_point(*p)).collect();
        // 畸形三角形只丢弃它自己，其余形状照常绘制
        if let Err(e) = overlay::draw_triangle(canvas, &mapped, &overlay::MESH_WIREFRAME) {
          warn!("跳过畸形三角形: {}", e);
        }
      }
    }
  }

  fn detections(&self) -> Vec<Detection> {
    self
      .feed
      .snapshot()
      .map(|s| s.detections.clone())
      .unwrap_or_default()
  }
}
