// 该文件是 Guanlan （观澜映物） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use anyhow::Result;
use clap::Parser;

use guanlan::analyzer::{FrameAnalyzer, IdleAnalyzer, ScriptedAnalyzer};
use guanlan::input::create_input_source;
use guanlan::output::create_output_writer;
use guanlan::permission::CameraPermission;
use guanlan::screen::create_screen;
use guanlan::task::ContinuousTask;

use args::{Args, parse_view_size};

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();
  let args = Args::parse();

  println!("Guanlan 实时视觉叠加");
  println!("====================");
  println!("界面路由: {}", args.route.as_str());
  println!("输入来源: {}", args.input);
  println!("输出目标: {}", args.output);
  println!("视图尺寸: {}", args.view_size);
  println!();

  // 摄像头权限三态：未授权时展示说明并体面退出，绝不带病运行
  let permission = CameraPermission::probe(&args.input);
  if !permission.is_granted() {
    println!("{}", permission.rationale());
    return Ok(());
  }

  let view = parse_view_size(&args.view_size)?;

  let analyzer: Box<dyn FrameAnalyzer> = match &args.script {
    Some(path) => {
      println!("正在加载检测脚本...");
      Box::new(ScriptedAnalyzer::from_path(path)?)
    }
    None => Box::new(IdleAnalyzer),
  };

  println!("正在打开输入源...");
  let input = create_input_source(&args.input)?;
  println!("输入源已打开: {}x{}", input.width(), input.height());

  let screen = create_screen(args.route, analyzer);
  let output = create_output_writer(&args.output)?;

  println!("开始处理...");
  ContinuousTask::new(args.max_frames).run(input, screen, output, view)
}
