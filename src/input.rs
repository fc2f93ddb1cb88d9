// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/input.rs - 检测结果与图像输入
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

use std::path::{Path, PathBuf};

use thiserror::Error;

mod read_detection_file;
pub use self::read_detection_file::{
  CompleteDetection, DetectionFile, DetectionFileInput, DetectionFileInputError, DetectionResults,
  RawDetection,
};

mod read_image_file;
pub use self::read_image_file::{ImageFileInput, ImageFileInputError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
  Detections,
  Image,
}

impl std::fmt::Display for InputKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      InputKind::Detections => f.write_str("检测结果文件"),
      InputKind::Image => f.write_str("图像文件"),
    }
  }
}

#[derive(Error, Debug)]
pub enum InputError {
  #[error("{kind}不存在: {}", .path.display())]
  NotFound { kind: InputKind, path: PathBuf },
  #[error("检测结果文件错误: {0}")]
  DetectionFileInputError(#[from] DetectionFileInputError),
  #[error("图像文件错误: {0}")]
  ImageFileInputError(#[from] ImageFileInputError),
}

/// 确认输入文件存在，在任何输出产生之前调用
pub fn ensure_exists(kind: InputKind, path: &Path) -> Result<(), InputError> {
  if path.exists() {
    Ok(())
  } else {
    Err(InputError::NotFound {
      kind,
      path: path.to_path_buf(),
    })
  }
}
