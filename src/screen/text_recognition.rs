// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/screen/text_recognition.rs - 文本识别界面
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
use tracing::info;

use super::{Route, Screen, analyze_or_empty};
use crate::analyzer::FrameAnalyzer;
use crate::detection::Detection;
use crate::feed::{Delivery, TextBinding, TextFeed};
use crate::frame::Frame;

/// 文本识别界面
///
/// 不持有结果列表，只持有一个标量：最近一次识别到的文本。
/// 替换是有条件的（非空白且与当前值不同），识别偶发返回空串时
/// 界面不会闪烁成空白。画面上不绘制几何叠加层，识别文本进入
/// 日志与记录输出。
pub struct TextRecognitionScreen {
  analyzer: Box<dyn FrameAnalyzer>,
  feed: TextFeed,
  binding: TextBinding,
}

impl TextRecognitionScreen {
  pub fn new(analyzer: Box<dyn FrameAnalyzer>) -> Self {
    let feed = TextFeed::new();
    let binding = feed.binding();
    Self {
      analyzer,
      feed,
      binding,
    }
  }

  /// 当前持有的识别文本
  pub fn current_text(&self) -> Option<String> {
    self.feed.current()
  }
}

impl Screen for TextRecognitionScreen {
  fn route(&self) -> Route {
    Route::TextRecognition
  }

  fn process_frame(&mut self, frame: &Frame) {
    let detections = analyze_or_empty(self.analyzer.as_mut(), frame);

    // 外部识别库每帧给出一段整体文本；取第一条文本结果即可
    let text = detections
      .iter()
      .find_map(|d| match d {
        Detection::Text { text } => Some(text.as_str()),
        _ => None,
      })
      .unwrap_or("");

    if self.binding.offer(text) == Delivery::Adopted {
      info!("识别到新文本: {}", text);
    }
  }

  fn redraw(&self, _canvas: &mut RgbImage) {
    // 本界面没有几何叠加层
  }

  fn detections(&self) -> Vec<Detection> {
    self
      .feed
      .current()
      .map(|text| vec![Detection::Text { text }])
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analyzer::ScriptedAnalyzer;

  fn text_frames(texts: &[&str]) -> Vec<Vec<Detection>> {
    texts
      .iter()
      .map(|t| {
        vec![Detection::Text {
          text: t.to_string(),
        }]
      })
      .collect()
  }

  fn frame() -> Frame {
    Frame {
      image: RgbImage::new(8, 8),
      index: 0,
      timestamp_ms: 0,
    }
  }

  #[test]
  fn keeps_text_across_blank_frames() {
    let script = text_frames(&["ABC", "", "ABC", "XYZ"]);
    let mut screen = TextRecognitionScreen::new(Box::new(ScriptedAnalyzer::from_frames(script)));

    screen.process_frame(&frame());
    assert_eq!(screen.current_text().as_deref(), Some("ABC"));

    // 空串不得清掉已识别的文本
    screen.process_frame(&frame());
    assert_eq!(screen.current_text().as_deref(), Some("ABC"));

    // 相同文本是空操作
    screen.process_frame(&frame());
    assert_eq!(screen.current_text().as_deref(), Some("ABC"));

    // 新文本才替换
    screen.process_frame(&frame());
    assert_eq!(screen.current_text().as_deref(), Some("XYZ"));
  }

  #[test]
  fn redraw_paints_no_geometry() {
    let script = text_frames(&["ABC"]);
    let mut screen = TextRecognitionScreen::new(Box::new(ScriptedAnalyzer::from_frames(script)));
    screen.process_frame(&frame());

    let mut canvas = RgbImage::new(32, 32);
    screen.redraw(&mut canvas);
    assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
  }

  #[test]
  fn record_output_sees_current_text() {
    let script = text_frames(&["ABC"]);
    let mut screen = TextRecognitionScreen::new(Box::new(ScriptedAnalyzer::from_frames(script)));

    assert!(screen.detections().is_empty());

    screen.process_frame(&frame());
    assert_eq!(
      screen.detections(),
      vec![Detection::Text {
        text: "ABC".to_string()
      }]
    );
  }
}
