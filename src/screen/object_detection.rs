// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/screen/object_detection.rs - 目标检测界面
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
use crate::geometry::{CoordinateMapper, Dimensions};
use crate::overlay;

/// 目标检测界面：为每个检测到的目标绘制边界框
pub struct ObjectDetectionScreen {
  analyzer: Box<dyn FrameAnalyzer>,
  feed: DetectionFeed,
  binding: AnalyzerBinding,
}

impl ObjectDetectionScreen {
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

impl Screen for ObjectDetectionScreen {
  fn route(&self) -> Route {
    Route::ObjectDetection
  }

  fn process_frame(&mut self, frame: &Frame) {
    let detections = analyze_or_empty(self.analyzer.as_mut(), frame);
    if self.binding.deliver(detections, frame.dimensions()) == Delivery::Unbound {
      warn!("目标检测结果投递到已销毁的馈送单元，已忽略");
    }
  }

  fn redraw(&self, canvas: &mut RgbImage) {
    let Some(snapshot) = self.feed.snapshot() else {
      return;
    };
    let view = Dimensions::new(canvas.width(), canvas.height());
    let Ok(mapper) = CoordinateMapper::new(snapshot.frame, view) else {
      // 尺寸不可用：跳过本帧绘制
      return;
    };

    for detection in &snapshot.detections {
      if let Detection::Object { bbox, .. } = detection {
        let top_left = mapper.map_point(bbox.top_left);
        let size = mapper.map_size(bbox.size);
        overlay::draw_bounding_box(canvas, top_left, size, &overlay::OBJECT_BOX);
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

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analyzer::ScriptedAnalyzer;
  use crate::detection::BoundingBox;

  #[test]
  fn replaces_results_wholesale_each_frame() {
    let script = vec![
      vec![
        Detection::Object {
          bbox: BoundingBox::new(10.0, 10.0, 5.0, 5.0),
          label: Some("cat".to_string()),
          confidence: Some(0.9),
        },
        Detection::Object {
          bbox: BoundingBox::new(30.0, 30.0, 5.0, 5.0),
          label: Some("dog".to_string()),
          confidence: Some(0.8),
        },
      ],
      vec![Detection::Object {
        bbox: BoundingBox::new(50.0, 50.0, 5.0, 5.0),
        label: Some("bird".to_string()),
        confidence: Some(0.7),
      }],
    ];
    let mut screen = ObjectDetectionScreen::new(Box::new(ScriptedAnalyzer::from_frames(script)));

    let frame = Frame {
      image: RgbImage::new(100, 100),
      index: 0,
      timestamp_ms: 0,
    };

    screen.process_frame(&frame);
    assert_eq!(screen.detections().len(), 2);

    // 第二帧整体替换，不累积
    screen.process_frame(&frame);
    let current = screen.detections();
    assert_eq!(current.len(), 1);
    assert_eq!(
      current[0],
      Detection::Object {
        bbox: BoundingBox::new(50.0, 50.0, 5.0, 5.0),
        label: Some("bird".to_string()),
        confidence: Some(0.7),
      }
    );
  }
}
