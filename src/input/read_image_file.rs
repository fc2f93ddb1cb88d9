// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, error};

use crate::FromPath;

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("无法打开图像 {}: {source}", .path.display())]
  IoError {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("无法加载图像 {}: {source}", .path.display())]
  ImageLoadError {
    path: PathBuf,
    source: image::ImageError,
  },
}

pub struct ImageFileInput {
  image: RgbImage,
}

impl FromPath for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_path(path: &Path) -> Result<Self, Self::Error> {
    let io_error = |source| ImageFileInputError::IoError {
      path: path.to_path_buf(),
      source,
    };

    // 按文件内容而非扩展名判断格式
    let image = ImageReader::open(path)
      .map_err(io_error)?
      .with_guessed_format()
      .map_err(io_error)?
      .decode()
      .map_err(|source| {
        error!("图像解码失败: {}", path.display());
        ImageFileInputError::ImageLoadError {
          path: path.to_path_buf(),
          source,
        }
      })?
      .to_rgb8();

    debug!(
      "读取图像: {} ({}x{})",
      path.display(),
      image.width(),
      image.height()
    );

    Ok(ImageFileInput { image })
  }
}

impl ImageFileInput {
  pub fn into_image(self) -> RgbImage {
    self.image
  }
}
