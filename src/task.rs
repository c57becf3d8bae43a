// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/task.rs - 帧循环任务
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

use std::{thread, time::Duration};

use anyhow::Result;
use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::{info, warn};

use crate::frame::Frame;
use crate::geometry::Dimensions;
use crate::input::InputSource;
use crate::output::OutputWriter;
use crate::screen::Screen;

/// 把一帧合成为视图空间的预览画面
///
/// 预览铺满整个视图：横纵各自独立缩放，与叠加层的坐标映射
/// 使用同一组缩放系数，因此叠加层恰好落在画面内容之上。
fn compose_preview(frame: &Frame, view: Dimensions) -> RgbImage {
  imageops::resize(&frame.image, view.width, view.height, FilterType::Triangle)
}

/// 持续任务：逐帧采集、分析、合成并输出，直到输入耗尽或被中断
#[derive(Default, Debug)]
pub struct ContinuousTask {
  max_frames: u64,
}

impl ContinuousTask {
  /// `max_frames` 为 0 表示不限制帧数
  pub fn new(max_frames: u64) -> Self {
    Self { max_frames }
  }

  pub fn run(
    &self,
    mut input: Box<dyn InputSource>,
    mut screen: Box<dyn Screen>,
    mut output: Box<dyn OutputWriter>,
    view: Dimensions,
  ) -> Result<()> {
    info!("开始任务: {}", screen.route().title());
    let (tx, rx) = std::sync::mpsc::channel();

    ctrlc::set_handler(move || {
      info!("收到中断信号，准备退出...");
      let _ = tx.send(());
      thread::spawn(|| {
        thread::sleep(Duration::from_secs(30));
        warn!("强制退出程序");
        std::process::exit(1);
      });
    })
    .expect("无法设置 Ctrl-C 处理器");

    let mut frame_count = 0u64;
    while let Some(frame_result) = input.next() {
      let frame = match frame_result {
        Ok(frame) => frame,
        Err(e) => {
          // 单帧失败不致命：跳过，等待下一帧
          warn!("读取帧失败，跳过: {}", e);
          continue;
        }
      };

      let now = std::time::Instant::now();
      screen.process_frame(&frame);
      let analyzed = now.elapsed();

      let mut canvas = compose_preview(&frame, view);
      screen.redraw(&mut canvas);
      output.write_frame(&canvas, &screen.detections())?;

      info!(
        "帧 {} 处理完成，分析 {:.2?} / 总计 {:.2?}",
        frame.index,
        analyzed,
        now.elapsed()
      );

      frame_count += 1;
      if self.max_frames > 0 && frame_count >= self.max_frames {
        info!("达到指定帧数 {}, 退出任务循环", frame_count);
        break;
      }
      if rx.try_recv().is_ok() {
        warn!("中断信号接收，退出任务循环");
        break;
      }
    }

    output.finish()?;
    info!("任务完成，共处理 {} 帧", frame_count);
    Ok(())
  }
}

/// 单帧任务：取一帧、分析、合成、输出，随即结束
pub struct OneShotTask;

impl OneShotTask {
  pub fn run(
    &self,
    mut input: Box<dyn InputSource>,
    mut screen: Box<dyn Screen>,
    mut output: Box<dyn OutputWriter>,
    view: Dimensions,
  ) -> Result<()> {
    info!("开始任务: {}", screen.route().title());

    let frame = input
      .next()
      .ok_or_else(|| anyhow::anyhow!("没有输入帧"))??;

    let now = std::time::Instant::now();
    screen.process_frame(&frame);
    info!("分析完成，耗时: {:.2?}", now.elapsed());

    let mut canvas = compose_preview(&frame, view);
    screen.redraw(&mut canvas);
    output.write_frame(&canvas, &screen.detections())?;
    output.finish()?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn preview_fills_view_with_independent_axes() {
    let frame = Frame {
      image: RgbImage::new(32, 32),
      index: 0,
      timestamp_ms: 0,
    };

    // 宽高比不同的视图：预览被拉伸铺满，不加黑边
    let preview = compose_preview(&frame, Dimensions::new(64, 128));
    assert_eq!(preview.width(), 64);
    assert_eq!(preview.height(), 128);
  }
}
