// 该文件是 Insulens （绝缘子标注） 项目的一部分。
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
// Copyright (C) 2026 Insulens 开发者

mod args;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use insulens::task::AnnotateTask;

fn main() -> ExitCode {
  tracing_subscriber::fmt::init();

  // clap 默认以 2 退出，这里统一为 1
  let args = match args::Args::try_parse() {
    Ok(args) => args,
    Err(err) => {
      if err.print().is_err() {
        eprintln!("{err}");
      }
      return if err.use_stderr() {
        ExitCode::FAILURE
      } else {
        ExitCode::SUCCESS
      };
    }
  };

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("错误: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(args: &args::Args) -> Result<()> {
  info!("检测结果文件: {}", args.detections.display());
  info!("源图像: {}", args.image.display());

  let task = AnnotateTask::new(&args.detections, &args.image)
    .with_context(|| format!("无法确定输出路径: {}", args.detections.display()))?;
  info!("输出目录: {}", task.layout().output_dir().display());

  let report = task.run()?;

  println!("已保存处理后的 JSON: {}", report.json_path.display());
  println!("已保存标注图像: {}", report.image_path.display());
  info!(
    "处理完成: 输入 {} 条检测, 保留 {} 条",
    report.raw_count, report.kept_count
  );

  Ok(())
}
