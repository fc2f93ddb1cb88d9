// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/args.rs - 项目参数配置
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

use std::path::PathBuf;

use clap::Parser;

/// 将检测结果规范化为标注记录，并在源图像上绘制检测框
///
/// 输出写入检测结果文件所在目录的上一级:
/// - jsons/<名称>_processed.json
/// - images/<名称>.jpg
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
  /// 检测结果 JSON 文件路径
  #[arg(value_name = "JSON_FILE")]
  pub detections: PathBuf,

  /// 源图像文件路径
  #[arg(value_name = "IMAGE_FILE")]
  pub image: PathBuf,
}
