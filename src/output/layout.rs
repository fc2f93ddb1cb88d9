// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/output/layout.rs - 输出目录布局
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

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub const JSONS_DIR: &str = "jsons";
pub const IMAGES_DIR: &str = "images";
pub const PROCESSED_SUFFIX: &str = "_processed";
pub const JSON_EXTENSION: &str = "json";
pub const IMAGE_EXTENSION: &str = "jpg";

#[derive(Error, Debug)]
pub enum LayoutError {
  #[error("无法确定绝对路径 {}: {source}", .path.display())]
  AbsolutePath {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("路径没有文件名: {}", .0.display())]
  NoFileName(PathBuf),
  #[error("无法创建目录 {}: {source}", .path.display())]
  CreateDir {
    path: PathBuf,
    source: std::io::Error,
  },
}

/// 由检测结果文件路径推导出的输出位置
///
/// 检测结果文件通常位于 `<输出目录>/jsons/` 下，输出目录取其所在目录的上一级：
///
/// ```text
/// <输出目录>/jsons/<名称>_processed.json
/// <输出目录>/images/<名称>.jpg
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
  output_dir: PathBuf,
  json_path: PathBuf,
  image_path: PathBuf,
}

impl OutputLayout {
  pub fn from_detection_file(path: &Path) -> Result<Self, LayoutError> {
    let absolute = std::path::absolute(path)
      .map(|p| normalize_lexically(&p))
      .map_err(|source| LayoutError::AbsolutePath {
        path: path.to_path_buf(),
        source,
      })?;

    let base_name = absolute
      .file_stem()
      .ok_or_else(|| LayoutError::NoFileName(path.to_path_buf()))?
      .to_string_lossy()
      .into_owned();

    let base_dir = absolute.parent().unwrap_or(&absolute);
    let output_dir = base_dir.parent().unwrap_or(base_dir).to_path_buf();

    let json_path = output_dir
      .join(JSONS_DIR)
      .join(format!("{base_name}{PROCESSED_SUFFIX}.{JSON_EXTENSION}"));
    let image_path = output_dir
      .join(IMAGES_DIR)
      .join(format!("{base_name}.{IMAGE_EXTENSION}"));

    debug!("输出目录: {}", output_dir.display());

    Ok(OutputLayout {
      output_dir,
      json_path,
      image_path,
    })
  }

  pub fn output_dir(&self) -> &Path {
    &self.output_dir
  }

  pub fn json_path(&self) -> &Path {
    &self.json_path
  }

  pub fn image_path(&self) -> &Path {
    &self.image_path
  }

  /// 创建 `jsons/` 与 `images/`，已存在时不报错
  pub fn create_dirs(&self) -> Result<(), LayoutError> {
    for path in [&self.json_path, &self.image_path] {
      if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| LayoutError::CreateDir {
          path: dir.to_path_buf(),
          source,
        })?;
      }
    }
    Ok(())
  }
}

/// 去掉 `.`，`..` 回退一级，不访问文件系统
fn normalize_lexically(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        // 根目录的上一级仍是根目录
        if !matches!(normalized.components().next_back(), Some(Component::RootDir) | None) {
          normalized.pop();
        }
      }
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}
