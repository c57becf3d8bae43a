// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/screen/mod.rs - 检测界面与路由
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

mod barcode_scanning;
mod face_mesh;
mod image_labeling;
mod object_detection;
mod text_recognition;

use clap::ValueEnum;
use image::RgbImage;

pub use barcode_scanning::BarcodeScanningScreen;
pub use face_mesh::FaceMeshScreen;
pub use image_labeling::ImageLabelingScreen;
pub use object_detection::ObjectDetectionScreen;
pub use text_recognition::TextRecognitionScreen;

use crate::analyzer::FrameAnalyzer;
use crate::detection::Detection;
use crate::frame::Frame;

/// 界面路由
///
/// 路由名即命令行取值，与各界面一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Route {
  #[value(name = "object_detection")]
  ObjectDetection,
  #[value(name = "face_mesh_detection")]
  FaceMeshDetection,
  #[value(name = "text_recognition")]
  TextRecognition,
  #[value(name = "barcode_scanning")]
  BarcodeScanning,
  #[value(name = "image_labeling")]
  ImageLabeling,
}

impl Route {
  /// 路由名
  pub fn as_str(&self) -> &'static str {
    match self {
      Route::ObjectDetection => "object_detection",
      Route::FaceMeshDetection => "face_mesh_detection",
      Route::TextRecognition => "text_recognition",
      Route::BarcodeScanning => "barcode_scanning",
      Route::ImageLabeling => "image_labeling",
    }
  }

  /// 界面标题
  pub fn title(&self) -> &'static str {
    match self {
      Route::ObjectDetection => "目标检测",
      Route::FaceMeshDetection => "人脸网格检测",
      Route::TextRecognition => "文本识别",
      Route::BarcodeScanning => "条码扫描",
      Route::ImageLabeling => "图像标注",
    }
  }
}

/// 检测界面
///
/// 每个界面持有自己的馈送单元与分析器。`process_frame` 是唯一的
/// 写入路径（对应分析回调），`redraw` 只读快照：先经坐标映射器
/// 换算到画布空间，再绘制叠加层。每次重绘都从干净画布开始，
/// 帧与帧之间不保留任何绘制痕迹。
pub trait Screen {
  /// 界面对应的路由
  fn route(&self) -> Route;

  /// 分析一帧并把结果投递进馈送单元
  ///
  /// 分析失败按零结果处理：记一条警告，本帧不重试。
  fn process_frame(&mut self, frame: &Frame);

  /// 把当前快照绘制到画布（视图空间）
  ///
  /// 快照为空或尺寸不可用时不绘制任何内容。
  fn redraw(&self, canvas: &mut RgbImage);

  /// 当前快照中的检测结果（用于记录输出）
  fn detections(&self) -> Vec<Detection>;
}

/// 按路由创建界面
pub fn create_screen(route: Route, analyzer: Box<dyn FrameAnalyzer>) -> Box<dyn Screen> {
  match route {
    Route::ObjectDetection => Box::new(ObjectDetectionScreen::new(analyzer)),
    Route::FaceMeshDetection => Box::new(FaceMeshScreen::new(analyzer)),
    Route::TextRecognition => Box::new(TextRecognitionScreen::new(analyzer)),
    Route::BarcodeScanning => Box::new(BarcodeScanningScreen::new(analyzer)),
    Route::ImageLabeling => Box::new(ImageLabelingScreen::new(analyzer)),
  }
}

/// 运行分析器并按「失败即零结果」策略收敛
fn analyze_or_empty(
  analyzer: &mut dyn FrameAnalyzer,
  frame: &Frame,
) -> Vec<Detection> {
  match analyzer.analyze(frame) {
    Ok(detections) => detections,
    Err(e) => {
      tracing::warn!("分析器 {} 处理帧 {} 失败: {}", analyzer.name(), frame.index, e);
      Vec::new()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analyzer::ScriptedAnalyzer;
  use crate::detection::BoundingBox;

  fn frame(width: u32, height: u32) -> Frame {
    Frame {
      image: RgbImage::new(width, height),
      index: 0,
      timestamp_ms: 0,
    }
  }

  #[test]
  fn route_names_are_stable() {
    assert_eq!(Route::ObjectDetection.as_str(), "object_detection");
    assert_eq!(Route::FaceMeshDetection.as_str(), "face_mesh_detection");
    assert_eq!(Route::TextRecognition.as_str(), "text_recognition");
    assert_eq!(Route::BarcodeScanning.as_str(), "barcode_scanning");
    assert_eq!(Route::ImageLabeling.as_str(), "image_labeling");
  }

  #[test]
  fn screen_without_results_paints_nothing() {
    let analyzer = Box::new(ScriptedAnalyzer::from_frames(Vec::new()));
    let screen = ObjectDetectionScreen::new(analyzer);

    // 尚未处理任何帧：重绘不得落笔
    let mut canvas = RgbImage::new(64, 64);
    screen.redraw(&mut canvas);
    assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
  }

  #[test]
  fn zero_dimension_frame_paints_nothing() {
    let script = vec![vec![Detection::Object {
      bbox: BoundingBox::new(10.0, 10.0, 5.0, 5.0),
      label: None,
      confidence: None,
    }]];
    let mut screen = ObjectDetectionScreen::new(Box::new(ScriptedAnalyzer::from_frames(script)));

    // 0x0 的帧：快照尺寸无效，重绘必须整帧跳过
    screen.process_frame(&frame(0, 0));

    let mut canvas = RgbImage::new(64, 64);
    screen.redraw(&mut canvas);
    assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
  }

  #[test]
  fn end_to_end_box_maps_into_view_space() {
    // 480x640 的帧、1080x2280 的视图，(100,100)+(50,80) 的框
    let script = vec![vec![Detection::Object {
      bbox: BoundingBox::new(100.0, 100.0, 50.0, 80.0),
      label: None,
      confidence: None,
    }]];
    let mut screen = ObjectDetectionScreen::new(Box::new(ScriptedAnalyzer::from_frames(script)));

    screen.process_frame(&frame(480, 640));

    let mut canvas = RgbImage::new(1080, 2280);
    screen.redraw(&mut canvas);

    // 映射后的框：左上 (225, 356.25)，尺寸 (112.5, 285)
    let yellow = crate::overlay::YELLOW;
    assert_eq!(*canvas.get_pixel(230, 356), yellow); // 顶边
    assert_eq!(*canvas.get_pixel(225, 400), yellow); // 左边
    assert_eq!(*canvas.get_pixel(300, 500), image::Rgb([0, 0, 0])); // 框内部
  }
}
