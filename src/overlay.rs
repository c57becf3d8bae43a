// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/overlay.rs - 叠加层绘制
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

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use thiserror::Error;

use crate::geometry::{PointF, SizeF};

pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
pub const CYAN: Rgb<u8> = Rgb([0, 255, 255]);

/// 绘制样式：颜色 + 线宽
///
/// 每种形状的样式都是编译期字面量，不暴露给用户配置。
#[derive(Debug, Clone, Copy)]
pub struct Style {
  pub color: Rgb<u8>,
  pub stroke: f32,
}

/// 目标检测边界框
pub const OBJECT_BOX: Style = Style {
  color: YELLOW,
  stroke: 10.0,
};

/// 人脸网格边界框
pub const MESH_BOX: Style = Style {
  color: YELLOW,
  stroke: 5.0,
};

/// 人脸网格三角线框
pub const MESH_WIREFRAME: Style = Style {
  color: CYAN,
  stroke: 1.0,
};

/// 条码边界框
pub const BARCODE_BOX: Style = Style {
  color: YELLOW,
  stroke: 5.0,
};

/// 人脸关键点颜色与半径
pub const LANDMARK_COLOR: Rgb<u8> = CYAN;
pub const LANDMARK_RADIUS: f32 = 3.0;

#[derive(Error, Debug)]
pub enum OverlayError {
  #[error("三角形顶点数量无效: 期望 3 个, 实际 {0} 个")]
  InvalidGeometry(usize),
}

/// 绘制一个未填充的矩形边框
///
/// 坐标与尺寸须已映射到画布（视图）空间。线宽通过逐像素内缩的
/// 空心矩形叠加实现；越出画布的部分由底层线段绘制裁掉，
/// 框的位置不因越界而偏移。
pub fn draw_bounding_box(canvas: &mut RgbImage, top_left: PointF, size: SizeF, style: &Style) {
  let x = top_left.x as i32;
  let y = top_left.y as i32;
  let width = size.width.max(0.0) as u32;
  let height = size.height.max(0.0) as u32;

  if width == 0 || height == 0 {
    return;
  }

  let stroke = style.stroke.round().max(1.0) as u32;
  for inset in 0..stroke {
    let w = width.saturating_sub(2 * inset);
    let h = height.saturating_sub(2 * inset);
    if w == 0 || h == 0 {
      break;
    }

    let rect = Rect::at(x + inset as i32, y + inset as i32).of_size(w, h);
    draw_hollow_rect_mut(canvas, rect, style.color);
  }
}

/// 在指定位置绘制一个实心圆点（关键点）
pub fn draw_landmark(canvas: &mut RgbImage, point: PointF, color: Rgb<u8>, radius: f32) {
  let center = (point.x.round() as i32, point.y.round() as i32);
  draw_filled_circle_mut(canvas, center, radius.round().max(1.0) as i32, color);
}

/// 绘制三角形的三条边（不填充）
///
/// 顶点数不为 3 时返回 [`OverlayError::InvalidGeometry`]，
/// 调用方应丢弃这一个形状并继续绘制其余形状。
pub fn draw_triangle(
  canvas: &mut RgbImage,
  vertices: &[PointF],
  style: &Style,
) -> Result<(), OverlayError> {
  if vertices.len() != 3 {
    return Err(OverlayError::InvalidGeometry(vertices.len()));
  }

  for i in 0..3 {
    let a = vertices[i];
    let b = vertices[(i + 1) % 3];
    draw_line_segment_mut(canvas, (a.x, a.y), (b.x, b.y), style.color);
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn blank(width: u32, height: u32) -> RgbImage {
    RgbImage::new(width, height)
  }

  fn painted_pixels(canvas: &RgbImage) -> usize {
    canvas.pixels().filter(|p| p.0 != [0, 0, 0]).count()
  }

  #[test]
  fn bounding_box_paints_outline_only() {
    let mut canvas = blank(100, 100);
    let style = Style {
      color: YELLOW,
      stroke: 1.0,
    };
    draw_bounding_box(&mut canvas, PointF::new(10.0, 10.0), SizeF::new(20.0, 20.0), &style);

    // 四角与边框被着色
    assert_eq!(*canvas.get_pixel(10, 10), YELLOW);
    assert_eq!(*canvas.get_pixel(29, 10), YELLOW);
    assert_eq!(*canvas.get_pixel(10, 29), YELLOW);
    assert_eq!(*canvas.get_pixel(29, 29), YELLOW);
    // 内部保持空白
    assert_eq!(*canvas.get_pixel(20, 20), Rgb([0, 0, 0]));
  }

  #[test]
  fn stroke_width_thickens_outline_inward() {
    let mut canvas = blank(100, 100);
    let style = Style {
      color: YELLOW,
      stroke: 3.0,
    };
    draw_bounding_box(&mut canvas, PointF::new(10.0, 10.0), SizeF::new(30.0, 30.0), &style);

    assert_eq!(*canvas.get_pixel(10, 20), YELLOW);
    assert_eq!(*canvas.get_pixel(11, 20), YELLOW);
    assert_eq!(*canvas.get_pixel(12, 20), YELLOW);
    assert_eq!(*canvas.get_pixel(13, 20), Rgb([0, 0, 0]));
  }

  #[test]
  fn triangle_renders_three_edges_under_identity_scale() {
    // 帧与视图尺寸一致时三角形应原样呈现
    let mut canvas = blank(40, 40);
    let vertices = [
      PointF::new(10.0, 10.0),
      PointF::new(20.0, 10.0),
      PointF::new(15.0, 20.0),
    ];

    draw_triangle(&mut canvas, &vertices, &MESH_WIREFRAME).expect("合法三角形");

    // 三个顶点
    assert_eq!(*canvas.get_pixel(10, 10), CYAN);
    assert_eq!(*canvas.get_pixel(20, 10), CYAN);
    assert_eq!(*canvas.get_pixel(15, 20), CYAN);
    // 顶边中点位于 (15, 10)
    assert_eq!(*canvas.get_pixel(15, 10), CYAN);
    // 重心不被填充
    assert_eq!(*canvas.get_pixel(15, 13), Rgb([0, 0, 0]));
  }

  #[test]
  fn malformed_triangle_is_rejected_without_drawing() {
    let mut canvas = blank(40, 40);
    let vertices = [PointF::new(10.0, 10.0), PointF::new(20.0, 10.0)];

    let err = draw_triangle(&mut canvas, &vertices, &MESH_WIREFRAME);
    assert!(matches!(err, Err(OverlayError::InvalidGeometry(2))));
    // 不允许画出残缺图形
    assert_eq!(painted_pixels(&canvas), 0);
  }

  #[test]
  fn landmark_paints_filled_disc() {
    let mut canvas = blank(40, 40);
    draw_landmark(&mut canvas, PointF::new(20.0, 20.0), LANDMARK_COLOR, LANDMARK_RADIUS);

    assert_eq!(*canvas.get_pixel(20, 20), CYAN);
    assert_eq!(*canvas.get_pixel(22, 20), CYAN);
    assert_eq!(*canvas.get_pixel(20, 18), CYAN);
  }

  #[test]
  fn box_past_top_left_keeps_its_position() {
    let mut canvas = blank(50, 50);
    let style = Style {
      color: YELLOW,
      stroke: 1.0,
    };
    // 左上越界：(-5,-5) 起、20x20 的框
    draw_bounding_box(&mut canvas, PointF::new(-5.0, -5.0), SizeF::new(20.0, 20.0), &style);

    // 画布内可见的右边与下边停留在原位
    assert_eq!(*canvas.get_pixel(14, 0), YELLOW);
    assert_eq!(*canvas.get_pixel(0, 14), YELLOW);
    // 左上角不得出现被推回画布内的边
    assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
  }

  #[test]
  fn off_canvas_box_is_clipped_silently() {
    let mut canvas = blank(50, 50);
    let style = Style {
      color: YELLOW,
      stroke: 2.0,
    };
    // 右下越界
    draw_bounding_box(&mut canvas, PointF::new(40.0, 40.0), SizeF::new(30.0, 30.0), &style);
    assert_eq!(*canvas.get_pixel(40, 41), YELLOW);
    // 完全越界时不绘制
    let mut empty = blank(50, 50);
    draw_bounding_box(&mut empty, PointF::new(60.0, 60.0), SizeF::new(10.0, 10.0), &style);
    assert_eq!(painted_pixels(&empty), 0);
  }
}
