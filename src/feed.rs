// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/feed.rs - 检测结果馈送单元
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

use std::sync::{Arc, RwLock, Weak};

use crate::detection::Detection;
use crate::geometry::Dimensions;

/// 一次投递的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
  /// 新结果已被采纳
  Adopted,
  /// 新结果被忽略（仅文本馈送：空白或与当前值相同）
  Ignored,
  /// 馈送单元已随界面销毁，投递成为空操作
  Unbound,
}

/// 馈送快照：结果列表与其所属帧的尺寸永远成对出现
#[derive(Debug)]
pub struct FeedSnapshot {
  pub detections: Vec<Detection>,
  pub frame: Dimensions,
}

/// 检测结果馈送单元
///
/// 两个状态：初始为空，此后每次投递整体替换为最新一帧的结果。
/// 结果列表与帧尺寸打包在同一个 [`FeedSnapshot`] 里以 `Arc` 原子换入，
/// 读取方拿到的快照不可能出现「新结果配旧尺寸」的撕裂组合。
/// 可变单元从不对外暴露；唯一的写入路径是分析回调持有的
/// [`AnalyzerBinding`]。
#[derive(Debug, Default)]
pub struct DetectionFeed {
  cell: Arc<RwLock<Option<Arc<FeedSnapshot>>>>,
}

impl DetectionFeed {
  pub fn new() -> Self {
    Self::default()
  }

  /// 为分析回调创建作用域绑定
  ///
  /// 绑定只持有对单元的弱引用：馈送单元随界面一起销毁后，
  /// 迟到的回调投递会自然落空，无需任何时序上的配合。
  pub fn binding(&self) -> AnalyzerBinding {
    AnalyzerBinding {
      cell: Arc::downgrade(&self.cell),
    }
  }

  /// 取当前快照；尚无结果时返回 `None`（安全缺省：本帧不绘制）
  pub fn snapshot(&self) -> Option<Arc<FeedSnapshot>> {
    self.cell.read().expect("馈送单元锁中毒").clone()
  }
}

/// 分析回调持有的投递句柄
#[derive(Debug, Clone)]
pub struct AnalyzerBinding {
  cell: Weak<RwLock<Option<Arc<FeedSnapshot>>>>,
}

impl AnalyzerBinding {
  /// 以新一帧的结果整体替换当前快照
  pub fn deliver(&self, detections: Vec<Detection>, frame: Dimensions) -> Delivery {
    let Some(cell) = self.cell.upgrade() else {
      return Delivery::Unbound;
    };

    let snapshot = Arc::new(FeedSnapshot { detections, frame });
    *cell.write().expect("馈送单元锁中毒") = Some(snapshot);
    Delivery::Adopted
  }
}

/// 文本识别界面的标量馈送单元
///
/// 与列表馈送不同，替换是有条件的：只采纳非空白且与当前值不同的
/// 新文本，避免识别偶发返回空串时界面闪烁成空白。
#[derive(Debug, Default)]
pub struct TextFeed {
  cell: Arc<RwLock<Option<String>>>,
}

impl TextFeed {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn binding(&self) -> TextBinding {
    TextBinding {
      cell: Arc::downgrade(&self.cell),
    }
  }

  /// 当前持有的文本
  pub fn current(&self) -> Option<String> {
    self.cell.read().expect("文本馈送锁中毒").clone()
  }
}

/// 文本馈送的投递句柄
#[derive(Debug, Clone)]
pub struct TextBinding {
  cell: Weak<RwLock<Option<String>>>,
}

impl TextBinding {
  /// 尝试采纳新识别的文本
  pub fn offer(&self, text: &str) -> Delivery {
    let Some(cell) = self.cell.upgrade() else {
      return Delivery::Unbound;
    };

    if text.trim().is_empty() {
      return Delivery::Ignored;
    }

    let mut held = cell.write().expect("文本馈送锁中毒");
    if held.as_deref() == Some(text) {
      return Delivery::Ignored;
    }

    *held = Some(text.to_string());
    Delivery::Adopted
  }
}
