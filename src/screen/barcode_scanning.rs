// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/screen/barcode_scanning.rs - 条码扫描界面
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
use tracing::{debug, warn};

use super::{Route, Screen, analyze_or_empty};
use crate::analyzer::FrameAnalyzer;
use crate::detection::Detection;
use crate::feed::{AnalyzerBinding, Delivery, DetectionFeed};
use crate::frame::Frame;
use crate::geometry::{CoordinateMapper, Dimensions};
use crate::overlay;

/// 条码扫描界面：框出条码位置，解码值进入日志与记录输出
pub struct BarcodeScanningScreen {
  analyzer: Box<dyn FrameAnalyzer>,
  feed: DetectionFeed,
  binding: AnalyzerBinding,
}

impl BarcodeScanningScreen {
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

impl Screen for BarcodeScanningScreen {
  fn route(&self) -> Route {
    Route::BarcodeScanning
  }

  fn process_frame(&mut self, frame: &Frame) {
    let detections = analyze_or_empty(self.analyzer.as_mut(), frame);

    for detection in &detections {
      if let Detection::Barcode { value, .. } = detection {
        if !value.is_empty() {
          debug!("解码条码: {}", value);
        }
      }
    }

    if self.binding.deliver(detections, frame.dimensions()) == Delivery::Unbound {
      warn!("条码结果投递到已销毁的馈送单元，已忽略");
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
      if let Detection::Barcode { bbox, .. } = detection {
        let top_left = mapper.map_point(bbox.top_left);
        let size = mapper.map_size(bbox.size);
        overlay::draw_bounding_box(canvas, top_left, size, &overlay::BARCODE_BOX);
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
