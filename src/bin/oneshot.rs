// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/bin/oneshot.rs - 单帧叠加渲染
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

use anyhow::Result;
use clap::Parser;

use guanlan::analyzer::{FrameAnalyzer, IdleAnalyzer, ScriptedAnalyzer};
use guanlan::geometry::Dimensions;
use guanlan::input::create_input_source;
use guanlan::output::create_output_writer;
use guanlan::permission::CameraPermission;
use guanlan::screen::{Route, create_screen};
use guanlan::task::OneShotTask;

/// 单帧叠加渲染参数
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测界面路由
  #[arg(long, value_enum, value_name = "ROUTE")]
  pub route: Route,

  /// 输入来源
  #[arg(long, value_name = "SOURCE")]
  pub input: String,

  /// 输出图片路径
  #[arg(long, value_name = "OUTPUT")]
  pub output: String,

  /// 检测脚本（JSON）
  #[arg(long, value_name = "FILE")]
  pub script: Option<PathBuf>,

  /// 视图宽度
  #[arg(long, default_value_t = 1080, value_name = "WIDTH")]
  pub view_width: u32,

  /// 视图高度
  #[arg(long, default_value_t = 1920, value_name = "HEIGHT")]
  pub view_height: u32,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();
  let args = Args::parse();

  let permission = CameraPermission::probe(&args.input);
  if !permission.is_granted() {
    println!("{}", permission.rationale());
    return Ok(());
  }

  let analyzer: Box<dyn FrameAnalyzer> = match &args.script {
    Some(path) => Box::new(ScriptedAnalyzer::from_path(path)?),
    None => Box::new(IdleAnalyzer),
  };

  let input = create_input_source(&args.input)?;
  let screen = create_screen(args.route, analyzer);
  let output = create_output_writer(&args.output)?;
  let view = Dimensions::new(args.view_width, args.view_height);

  OneShotTask.run(input, screen, output, view)
}
