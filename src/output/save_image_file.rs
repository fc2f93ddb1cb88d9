// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/output/save_image_file.rs - 保存标注图像
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

use image::RgbImage;
use thiserror::Error;
use tracing::info;

use crate::{
  FromPath,
  model::{DetectResult, WithLabel},
  output::{
    Render,
    draw::{Draw, DrawDetectionOnImage, DrawError},
  },
};

pub struct SaveImageFileOutput {
  path: PathBuf,
  draw: Draw,
}

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("无法保存图像 {}: {source}", .path.display())]
  ImageError {
    path: PathBuf,
    source: image::ImageError,
  },
  #[error("{0}")]
  DrawError(#[from] DrawError),
}

impl FromPath for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn from_path(path: &Path) -> Result<Self, Self::Error> {
    Ok(SaveImageFileOutput {
      path: path.to_path_buf(),
      draw: Draw::new()?,
    })
  }
}

impl SaveImageFileOutput {
  /// 编码格式由扩展名决定，已存在的文件直接覆盖
  fn save_image(&self, image: &RgbImage) -> Result<(), SaveImageFileError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    image
      .save(&self.path)
      .map_err(|source| SaveImageFileError::ImageError {
        path: self.path.clone(),
        source,
      })?;

    info!("保存图像到文件: {}", self.path.display());

    Ok(())
  }
}

impl<T: WithLabel> Render<RgbImage, DetectResult<T>> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(&self, frame: &mut RgbImage, result: &DetectResult<T>) -> Result<(), Self::Error> {
    self.draw.draw_detections_on_image(frame, result);
    self.save_image(frame)
  }
}
