// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/model.rs - 类别标签与检测结果
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

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Number;

/// 绝缘子检测模型输出的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsulatorLabel {
  GlassDirty,
  GlassLoss,
  Polymer,
  PolymerDirty,
  TwoGlass,
  BrokenDisc,
  Insulator,
  PollutionFlashover,
  Snow,
  Unknown,
}

/// 类别编号到标签的固定映射，下标即类别编号
///
/// 9、10、11 与 2、4、6 指向同一标签。
pub const CLASS_MAP: [InsulatorLabel; 12] = [
  InsulatorLabel::GlassDirty,
  InsulatorLabel::GlassLoss,
  InsulatorLabel::Polymer,
  InsulatorLabel::PolymerDirty,
  InsulatorLabel::TwoGlass,
  InsulatorLabel::BrokenDisc,
  InsulatorLabel::Insulator,
  InsulatorLabel::PollutionFlashover,
  InsulatorLabel::Snow,
  InsulatorLabel::Polymer,
  InsulatorLabel::TwoGlass,
  InsulatorLabel::Insulator,
];

pub const UNKNOWN_LABEL: &str = "unknown";

impl InsulatorLabel {
  pub const fn as_str(&self) -> &'static str {
    match self {
      InsulatorLabel::GlassDirty => "Glassdirty",
      InsulatorLabel::GlassLoss => "Glassloss",
      InsulatorLabel::Polymer => "Polymer",
      InsulatorLabel::PolymerDirty => "Polymerdirty",
      InsulatorLabel::TwoGlass => "Two glass",
      InsulatorLabel::BrokenDisc => "broken disc",
      InsulatorLabel::Insulator => "insulator",
      InsulatorLabel::PollutionFlashover => "pollution-flashover",
      InsulatorLabel::Snow => "snow",
      InsulatorLabel::Unknown => UNKNOWN_LABEL,
    }
  }
}

pub trait WithLabel: Sized + std::fmt::Debug {
  fn to_label_str(&self) -> String;
  /// 查表，表外编号返回“未知”标签
  fn from_label_id(id: i64) -> Self;
  fn unknown() -> Self;
}

impl WithLabel for InsulatorLabel {
  fn to_label_str(&self) -> String {
    self.as_str().to_string()
  }

  fn from_label_id(id: i64) -> Self {
    usize::try_from(id)
      .ok()
      .and_then(|index| CLASS_MAP.get(index).copied())
      .unwrap_or(InsulatorLabel::Unknown)
  }

  fn unknown() -> Self {
    InsulatorLabel::Unknown
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectItem<T> {
  pub kind: T,
  /// 原样保留输入中的数值
  pub score: Number,
  pub bbox: [i64; 4], // [x_min, y_min, x_max, y_max]
}

impl<T> DetectItem<T> {
  pub fn score_f64(&self) -> f64 {
    self.score.as_f64().unwrap_or(f64::NAN)
  }
}

impl<T: WithLabel> Serialize for DetectItem<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("DetectItem", 3)?;
    state.serialize_field("label", &self.kind.to_label_str())?;
    state.serialize_field("confidence", &self.score)?;
    state.serialize_field("bbox", &self.bbox)?;
    state.end()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectResult<T> {
  pub items: Box<[DetectItem<T>]>,
}

impl<T> DetectResult<T> {
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

impl<T> Default for DetectResult<T> {
  fn default() -> Self {
    Self {
      items: Box::new([]),
    }
  }
}

impl<T> FromIterator<DetectItem<T>> for DetectResult<T> {
  fn from_iter<I: IntoIterator<Item = DetectItem<T>>>(iter: I) -> Self {
    Self {
      items: iter.into_iter().collect(),
    }
  }
}

impl<T: WithLabel> Serialize for DetectResult<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.items.serialize(serializer)
  }
}
