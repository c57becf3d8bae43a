// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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

use std::path::PathBuf;

use chrono::{Datelike, Utc};
use image::RgbImage;
use thiserror::Error;

use super::OutputWriter;
use crate::detection::Detection;
use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum DirectoryRecordError {
  #[error("URL 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  Image(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  Json(#[from] serde_json::Error),
}

/// 目录记录输出
///
/// 以 `folder://` URL 描述：路径为基础目录（经 URL 解码），
/// 查询参数 `always=true` 表示没有检测结果的帧也要记录。
/// 帧写入当天日期命名的子目录，每帧一张 PNG 外加一个同名 JSON
/// 附带文件，内容为该帧全部检测结果。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  always: bool,
  frame_counter: u64,
  prepared: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordError;

  fn from_url(url: &url::Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(DirectoryRecordError::SchemeMismatch);
    }

    let base = urlencoding::decode(url.path())
      .map(|p| PathBuf::from(p.into_owned()))
      .unwrap_or_else(|_| PathBuf::from(url.path()));

    let mut always = false;
    for (key, value) in url.query_pairs() {
      if key == "always" {
        always = value == "true" || value == "1";
      }
    }

    let today = Utc::now();
    let directory = base.join(format!(
      "{:04}-{:02}-{:02}",
      today.year(),
      today.month(),
      today.day()
    ));

    Ok(Self {
      directory,
      always,
      frame_counter: 0,
      prepared: false,
    })
  }
}

impl DirectoryRecordOutput {
  /// 目录在首次写入时才创建，空跑不留痕
  fn ensure_directory(&mut self) -> Result<(), DirectoryRecordError> {
    if !self.prepared {
      std::fs::create_dir_all(&self.directory)?;
      self.prepared = true;
    }
    Ok(())
  }

  fn record_frame(
    &mut self,
    image: &RgbImage,
    detections: &[Detection],
  ) -> Result<(), DirectoryRecordError> {
    self.ensure_directory()?;

    let image_path = self.directory.join(format!("frame_{:06}.png", self.frame_counter));
    image.save(&image_path)?;

    let sidecar: Vec<serde_json::Value> = detections.iter().map(Detection::to_json).collect();
    let text = serde_json::to_string_pretty(&serde_json::Value::Array(sidecar))?;
    std::fs::write(image_path.with_extension("json"), text)?;

    self.frame_counter += 1;
    Ok(())
  }
}

impl OutputWriter for DirectoryRecordOutput {
  fn write_frame(&mut self, image: &RgbImage, detections: &[Detection]) -> anyhow::Result<()> {
    if detections.is_empty() && !self.always {
      return Ok(());
    }

    self.record_frame(image, detections)?;
    Ok(())
  }

  fn finish(&mut self) -> anyhow::Result<()> {
    tracing::info!("目录记录完成，共 {} 帧: {}", self.frame_counter, self.directory.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_folder_url_with_query() {
    let url = url::Url::parse("folder:///tmp/guanlan%20records?always=true").expect("URL 合法");
    let output = DirectoryRecordOutput::from_url(&url).expect("方案匹配");

    assert!(output.always);
    // 路径经过 URL 解码，并追加日期子目录
    let dir = output.directory.to_string_lossy();
    assert!(dir.starts_with("/tmp/guanlan records/"));
  }

  #[test]
  fn rejects_other_schemes() {
    let url = url::Url::parse("file:///tmp/records").expect("URL 合法");
    assert!(matches!(
      DirectoryRecordOutput::from_url(&url),
      Err(DirectoryRecordError::SchemeMismatch)
    ));
  }

  #[test]
  fn skips_empty_frames_unless_always() {
    let url = url::Url::parse("folder:///tmp/guanlan-test-records").expect("URL 合法");
    let mut output = DirectoryRecordOutput::from_url(&url).expect("方案匹配");

    // 无结果且未开启 always：不写入，也不建目录
    let canvas = RgbImage::new(4, 4);
    output.write_frame(&canvas, &[]).expect("写入成功");
    assert_eq!(output.frame_counter, 0);
    assert!(!output.prepared);
  }
}
