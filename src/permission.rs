// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/permission.rs - 摄像头访问权限
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

use std::io::ErrorKind;

/// 摄像头访问权限的三态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
  /// 可以访问，允许打开实时画面
  Granted,
  /// 被拒绝但可补救（设备存在而无读取权限），应向用户说明
  DeniedShowRationale,
  /// 摄像头不可用（设备不存在）
  Denied,
}

impl PermissionStatus {
  pub fn is_granted(&self) -> bool {
    matches!(self, PermissionStatus::Granted)
  }

  /// 对应状态下展示给用户的提示语
  pub fn rationale(&self) -> &'static str {
    match self {
      PermissionStatus::Granted => "摄像头可用",
      PermissionStatus::DeniedShowRationale => {
        "没有读取摄像头设备的权限，请将当前用户加入 video 组或调整设备权限后重试"
      }
      PermissionStatus::Denied => "摄像头不可用：找不到对应的视频设备",
    }
  }
}

/// 摄像头权限探测
pub struct CameraPermission;

impl CameraPermission {
  /// 探测输入来源的访问权限
  ///
  /// 非摄像头来源（图片、目录）不涉及设备权限，视为已授权；
  /// 摄像头来源按设备节点的真实可达性归入三态。
  pub fn probe(source: &str) -> PermissionStatus {
    let Some(path) = Self::device_path(source) else {
      return PermissionStatus::Granted;
    };

    match std::fs::File::open(path) {
      Ok(_) => PermissionStatus::Granted,
      Err(e) if e.kind() == ErrorKind::NotFound => PermissionStatus::Denied,
      Err(e) if e.kind() == ErrorKind::PermissionDenied => PermissionStatus::DeniedShowRationale,
      Err(_) => PermissionStatus::DeniedShowRationale,
    }
  }

  fn device_path(source: &str) -> Option<&str> {
    if source.starts_with("v4l2://") {
      return Some(source.trim_start_matches("v4l2://"));
    }
    if source.starts_with("/dev/video") {
      return Some(source);
    }
    None
  }
}
