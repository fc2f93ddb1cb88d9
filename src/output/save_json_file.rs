// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/output/save_json_file.rs - 保存规范化后的检测结果
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

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;
use tracing::info;

use crate::{
  FromPath,
  model::{DetectResult, WithLabel},
  output::Record,
};

const JSON_INDENT: &[u8] = b"    ";

#[derive(Error, Debug)]
pub enum SaveJsonFileError {
  #[error("无法写入 {}: {source}", .path.display())]
  IoError {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("JSON 序列化错误: {0}")]
  SerializeError(#[from] serde_json::Error),
}

/// 四空格缩进，无结尾换行
pub fn to_pretty_json<S: Serialize + ?Sized>(value: &S) -> Result<Vec<u8>, serde_json::Error> {
  let mut buffer = Vec::new();
  let formatter = PrettyFormatter::with_indent(JSON_INDENT);
  let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
  value.serialize(&mut serializer)?;
  Ok(buffer)
}

pub struct SaveJsonFileOutput {
  path: PathBuf,
}

impl FromPath for SaveJsonFileOutput {
  type Error = SaveJsonFileError;

  fn from_path(path: &Path) -> Result<Self, Self::Error> {
    Ok(SaveJsonFileOutput {
      path: path.to_path_buf(),
    })
  }
}

impl<T: WithLabel> Record<DetectResult<T>> for SaveJsonFileOutput {
  type Error = SaveJsonFileError;

  fn record_result(&self, result: &DetectResult<T>) -> Result<(), Self::Error> {
    let io_error = |source| SaveJsonFileError::IoError {
      path: self.path.clone(),
      source,
    };

    let bytes = to_pretty_json(result)?;
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(&self.path, bytes).map_err(io_error)?;

    info!("保存检测结果到文件: {}", self.path.display());

    Ok(())
  }
}
