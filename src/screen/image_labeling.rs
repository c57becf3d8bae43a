// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/screen/image_labeling.rs - 图像标注界面
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

/// 图像标注界面
///
/// 标签没有几何，画面上不绘制叠加层；
/// 当前标签集进入日志与记录输出。
pub struct ImageLabelingScreen {
  analyzer: Box<dyn FrameAnalyzer>,
  feed: DetectionFeed,
  binding: AnalyzerBinding,
}

impl ImageLabelingScreen {
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

impl Screen for ImageLabelingScreen {
  fn route(&self) -> Route {
    Route::ImageLabeling
  }

  fn process_frame(&mut self, frame: &Frame) {
    let detections = analyze_or_empty(self.analyzer.as_mut(), frame);

    for detection in &detections {
      if let Detection::Label { label, confidence } = detection {
        debug!("图像标签: {} ({:.2})", label, confidence);
      }
    }

    if self.binding.deliver(detections, frame.dimensions()) == Delivery::Unbound {
      warn!("图像标签投递到已销毁的馈送单元，已忽略");
    }
  }

  fn redraw(&self, _canvas: &mut RgbImage) {
    // 标签没有几何叠加层
  }

  fn detections(&self) -> Vec<Detection> {
    self
      .feed
      .snapshot()
      .map(|s| s.detections.clone())
      .unwrap_or_default()
  }
}
