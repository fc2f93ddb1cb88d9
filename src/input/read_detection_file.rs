// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/input/read_detection_file.rs - 检测结果文件输入
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

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::debug;

use crate::FromPath;

#[derive(Error, Debug)]
pub enum DetectionFileInputError {
  #[error("无法读取 {}: {source}", .path.display())]
  IoError {
    path: PathBuf,
    source: std::io::Error,
  },
  #[error("无法解析 {}: {source}", .path.display())]
  ParseError {
    path: PathBuf,
    source: serde_json::Error,
  },
}

/// 推理服务写出的检测结果文件，缺失的 `results` 或 `detections` 视为空
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionFile {
  #[serde(default)]
  pub results: DetectionResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionResults {
  #[serde(default)]
  pub detections: Vec<RawDetection>,
}

/// 单条原始检测，只有键不存在时字段才为 `None`
///
/// `"class": null` 仍算作存在，随后解析为未知类别；
/// `confidence` 或 `bbox` 为 `null` 时无法解析，整个文件报错。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDetection {
  #[serde(default, deserialize_with = "present")]
  pub class: Option<Value>,
  #[serde(default, deserialize_with = "present")]
  pub confidence: Option<Number>,
  #[serde(default, deserialize_with = "present")]
  pub bbox: Option<Vec<f64>>,
}

/// 键存在即为 `Some`，不把 `null` 折叠成 `None`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

impl RawDetection {
  /// `class`、`confidence`、`bbox` 三个键齐全时返回
  pub fn as_complete(&self) -> Option<CompleteDetection<'_>> {
    Some(CompleteDetection {
      class: self.class.as_ref()?,
      confidence: self.confidence.as_ref()?,
      bbox: self.bbox.as_deref()?,
    })
  }

  pub fn class_id(&self) -> Option<i64> {
    self.class.as_ref().and_then(class_id)
  }
}

/// 必需字段齐全的检测
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompleteDetection<'a> {
  pub class: &'a Value,
  pub confidence: &'a Number,
  pub bbox: &'a [f64],
}

impl CompleteDetection<'_> {
  pub fn class_id(&self) -> Option<i64> {
    class_id(self.class)
  }
}

/// 整数类别编号；`6.0` 这样的整值浮点数同样接受
fn class_id(value: &Value) -> Option<i64> {
  match value {
    Value::Number(n) => n.as_i64().or_else(|| {
      n.as_f64()
        .filter(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64)
        .map(|v| v as i64)
    }),
    _ => None,
  }
}

impl std::str::FromStr for DetectionFile {
  type Err = serde_json::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    serde_json::from_str(s)
  }
}

pub struct DetectionFileInput {
  file: DetectionFile,
}

impl FromPath for DetectionFileInput {
  type Error = DetectionFileInputError;

  fn from_path(path: &Path) -> Result<Self, Self::Error> {
    let text = std::fs::read_to_string(path).map_err(|source| DetectionFileInputError::IoError {
      path: path.to_path_buf(),
      source,
    })?;
    let file = text
      .parse::<DetectionFile>()
      .map_err(|source| DetectionFileInputError::ParseError {
        path: path.to_path_buf(),
        source,
      })?;

    debug!(
      "读取检测结果文件: {}, 共 {} 条",
      path.display(),
      file.results.detections.len()
    );

    Ok(DetectionFileInput { file })
  }
}

impl DetectionFileInput {
  pub fn detections(&self) -> &[RawDetection] {
    &self.file.results.detections
  }
}
