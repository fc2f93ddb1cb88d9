// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/output.rs - 输出定义
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

use thiserror::Error;

/// 将结果绘制到帧上并输出，帧就地修改
pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &mut Frame, result: &Output) -> Result<(), Self::Error>;
}

/// 仅记录结果，不涉及图像
pub trait Record<Output>: Sized {
  type Error;
  fn record_result(&self, result: &Output) -> Result<(), Self::Error>;
}

pub mod draw;
pub mod layout;

mod save_image_file;
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

mod save_json_file;
pub use self::save_json_file::{SaveJsonFileError, SaveJsonFileOutput, to_pretty_json};

pub use self::layout::{LayoutError, OutputLayout};

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[error("保存 JSON 文件错误: {0}")]
  SaveJsonFileError(#[from] SaveJsonFileError),
  #[error("输出路径错误: {0}")]
  LayoutError(#[from] LayoutError),
}
