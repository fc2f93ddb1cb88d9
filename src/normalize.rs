// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/normalize.rs - 检测结果规范化
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

use std::marker::PhantomData;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
  input::{CompleteDetection, RawDetection},
  model::{DetectItem, DetectResult, WithLabel},
};

pub trait Normalize {
  type Input: ?Sized;
  type Output;
  type Error;

  fn normalize(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[derive(Error, Debug, PartialEq)]
pub enum NormalizeError {
  #[error("第 {index} 条检测的 bbox 只有 {len} 个坐标")]
  ShortBoundingBox { index: usize, len: usize },
}

/// 过滤不完整的检测，将类别编号映射为标签，坐标向下取整
pub struct DetectionNormalizer<T> {
  _phantom: PhantomData<T>,
}

impl<T> Default for DetectionNormalizer<T> {
  fn default() -> Self {
    Self {
      _phantom: PhantomData,
    }
  }
}

/// `floor` 后转为整数，超出 `i64` 范围时饱和
pub fn floor_bbox(bbox: &[f64; 4]) -> [i64; 4] {
  bbox.map(|v| v.floor() as i64)
}

impl<T: WithLabel> DetectionNormalizer<T> {
  pub fn new() -> Self {
    Self::default()
  }

  fn normalize_one(
    &self,
    index: usize,
    detection: CompleteDetection<'_>,
  ) -> Result<DetectItem<T>, NormalizeError> {
    let bbox: &[f64; 4] =
      detection
        .bbox
        .first_chunk()
        .ok_or(NormalizeError::ShortBoundingBox {
          index,
          len: detection.bbox.len(),
        })?;

    let kind = detection
      .class_id()
      .map(T::from_label_id)
      .unwrap_or_else(T::unknown);

    Ok(DetectItem {
      kind,
      score: detection.confidence.clone(),
      bbox: floor_bbox(bbox),
    })
  }
}

impl<T: WithLabel> Normalize for DetectionNormalizer<T> {
  type Input = [RawDetection];
  type Output = DetectResult<T>;
  type Error = NormalizeError;

  fn normalize(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let result = input
      .iter()
      .enumerate()
      .filter_map(|(index, raw)| match raw.as_complete() {
        Some(detection) => Some((index, detection)),
        None => {
          debug!("跳过第 {} 条不完整的检测", index);
          None
        }
      })
      .map(|(index, detection)| self.normalize_one(index, detection))
      .collect::<Result<DetectResult<T>, _>>()?;

    info!("规范化完成: 输入 {} 条, 保留 {} 条", input.len(), result.len());

    Ok(result)
  }
}
