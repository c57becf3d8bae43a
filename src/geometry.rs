// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/geometry.rs - 帧空间到视图空间的坐标映射
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

use thiserror::Error;

/// 二维点（像素坐标）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointF {
  pub x: f32,
  pub y: f32,
}

impl PointF {
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }
}

/// 二维尺寸（像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeF {
  pub width: f32,
  pub height: f32,
}

impl SizeF {
  pub fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }
}

/// 图像或视图的整数尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
  pub width: u32,
  pub height: u32,
}

impl Dimensions {
  pub fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }

  /// 宽高均非零时尺寸才可用于映射
  pub fn is_valid(&self) -> bool {
    self.width > 0 && self.height > 0
  }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
  #[error("帧或视图尺寸无效（存在零值）")]
  InvalidDimensions,
}

/// 坐标映射器
///
/// 将分析帧像素空间中的点与尺寸换算到视图（屏幕）像素空间。
/// 横纵两个方向的缩放系数相互独立：当帧与视图的宽高比不一致时，
/// 圆形或正方形的检测结果会被拉伸。这是刻意保留的既有行为，
/// 不做等比缩放或加黑边修正。
///
/// 映射器无内部状态，可被任意多个调用方并发使用。
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
  scale_x: f32,
  scale_y: f32,
}

impl CoordinateMapper {
  /// 由帧尺寸与视图尺寸构造映射器
  ///
  /// 任一尺寸存在零值时返回 [`GeometryError::InvalidDimensions`]；
  /// 调用方应跳过本帧的绘制而不是带着零尺寸调用。
  pub fn new(frame: Dimensions, view: Dimensions) -> Result<Self, GeometryError> {
    if !frame.is_valid() || !view.is_valid() {
      return Err(GeometryError::InvalidDimensions);
    }

    Ok(Self {
      scale_x: view.width as f32 / frame.width as f32,
      scale_y: view.height as f32 / frame.height as f32,
    })
  }

  /// 将帧空间中的点映射到视图空间
  pub fn map_point(&self, p: PointF) -> PointF {
    PointF {
      x: p.x * self.scale_x,
      y: p.y * self.scale_y,
    }
  }

  /// 将帧空间中的尺寸映射到视图空间
  pub fn map_size(&self, s: SizeF) -> SizeF {
    SizeF {
      width: s.width * self.scale_x,
      height: s.height * self.scale_y,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_axes_independently() {
    // 480x640 的帧映射到 1080x2280 的视图
    let mapper = CoordinateMapper::new(Dimensions::new(480, 640), Dimensions::new(1080, 2280))
      .expect("尺寸合法");

    let p = mapper.map_point(PointF::new(100.0, 100.0));
    assert_eq!(p, PointF::new(225.0, 356.25));

    let s = mapper.map_size(SizeF::new(50.0, 80.0));
    assert_eq!(s, SizeF::new(112.5, 285.0));
  }

  #[test]
  fn point_mapping_is_linear_and_separable() {
    let mapper = CoordinateMapper::new(Dimensions::new(320, 240), Dimensions::new(1280, 720))
      .expect("尺寸合法");

    let a = mapper.map_point(PointF::new(10.0, 30.0));
    let b = mapper.map_point(PointF::new(20.0, 30.0));
    let c = mapper.map_point(PointF::new(10.0, 60.0));

    // x 只由 x 决定，y 只由 y 决定
    assert_eq!(a.y, b.y);
    assert_eq!(a.x, c.x);
    assert_eq!(b.x, 2.0 * a.x);
    assert_eq!(c.y, 2.0 * a.y);
  }

  #[test]
  fn identity_when_frame_matches_view() {
    let dims = Dimensions::new(640, 480);
    let mapper = CoordinateMapper::new(dims, dims).expect("尺寸合法");

    let p = mapper.map_point(PointF::new(123.5, 77.25));
    assert_eq!(p, PointF::new(123.5, 77.25));

    let s = mapper.map_size(SizeF::new(50.0, 80.0));
    assert_eq!(s, SizeF::new(50.0, 80.0));
  }

  #[test]
  fn rejects_zero_dimensions() {
    let view = Dimensions::new(1080, 1920);
    assert!(matches!(
      CoordinateMapper::new(Dimensions::new(0, 640), view),
      Err(GeometryError::InvalidDimensions)
    ));
    assert!(matches!(
      CoordinateMapper::new(Dimensions::new(480, 0), view),
      Err(GeometryError::InvalidDimensions)
    ));
    assert!(matches!(
      CoordinateMapper::new(Dimensions::new(480, 640), Dimensions::new(0, 0)),
      Err(GeometryError::InvalidDimensions)
    ));
  }
}
