// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/task.rs - 标注任务
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
use std::time::Instant;

use thiserror::Error;
use tracing::info;

use crate::{
  FromPath,
  input::{self, DetectionFileInput, ImageFileInput, InputError, InputKind},
  model::InsulatorLabel,
  normalize::{DetectionNormalizer, Normalize, NormalizeError},
  output::{
    OutputError, OutputLayout, Record, Render, SaveImageFileOutput, SaveJsonFileOutput,
  },
};

#[derive(Error, Debug)]
pub enum TaskError {
  #[error(transparent)]
  Input(#[from] InputError),
  #[error(transparent)]
  Normalize(#[from] NormalizeError),
  #[error(transparent)]
  Output(#[from] OutputError),
}

/// 一次运行写出的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateReport {
  pub json_path: PathBuf,
  pub image_path: PathBuf,
  pub raw_count: usize,
  pub kept_count: usize,
}

/// 读取检测结果 → 规范化 → 写 JSON → 读图 → 绘制 → 写图
///
/// 两个输出之间没有事务：JSON 写出后若图像解码失败，JSON 文件保留。
pub struct AnnotateTask {
  detections: PathBuf,
  image: PathBuf,
  layout: OutputLayout,
}

impl AnnotateTask {
  pub fn new(detections: &Path, image: &Path) -> Result<Self, TaskError> {
    let layout = OutputLayout::from_detection_file(detections).map_err(OutputError::from)?;

    Ok(Self {
      detections: detections.to_path_buf(),
      image: image.to_path_buf(),
      layout,
    })
  }

  pub fn layout(&self) -> &OutputLayout {
    &self.layout
  }

  pub fn run(self) -> Result<AnnotateReport, TaskError> {
    info!("开始任务...");
    let now = Instant::now();

    input::ensure_exists(InputKind::Detections, &self.detections)?;
    input::ensure_exists(InputKind::Image, &self.image)?;
    self.layout.create_dirs().map_err(OutputError::from)?;

    let raw = DetectionFileInput::from_path(&self.detections).map_err(InputError::from)?;
    let normalizer = DetectionNormalizer::<InsulatorLabel>::new();
    let result = normalizer.normalize(raw.detections())?;
    info!("规范化完成，耗时: {:.2?}", now.elapsed());

    let record = SaveJsonFileOutput::from_path(self.layout.json_path()).map_err(OutputError::from)?;
    record.record_result(&result).map_err(OutputError::from)?;

    let mut frame = ImageFileInput::from_path(&self.image)
      .map_err(InputError::from)?
      .into_image();
    let render = SaveImageFileOutput::from_path(self.layout.image_path()).map_err(OutputError::from)?;
    render
      .render_result(&mut frame, &result)
      .map_err(OutputError::from)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(AnnotateReport {
      json_path: self.layout.json_path().to_path_buf(),
      image_path: self.layout.image_path().to_path_buf(),
      raw_count: raw.detections().len(),
      kept_count: result.len(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  struct Workspace {
    _dir: tempfile::TempDir,
    root: PathBuf,
  }

  impl Workspace {
    fn new() -> Self {
      let dir = tempfile::tempdir().expect("create temp dir");
      let root = dir.path().to_path_buf();
      std::fs::create_dir_all(root.join("jsons")).unwrap();
      std::fs::create_dir_all(root.join("uploads")).unwrap();
      Self { _dir: dir, root }
    }

    fn detections(&self, body: &str) -> PathBuf {
      let path = self.root.join("jsons").join("frame.json");
      std::fs::write(&path, body).unwrap();
      path
    }

    fn image(&self) -> PathBuf {
      let path = self.root.join("uploads").join("frame.png");
      RgbImage::from_pixel(120, 120, Rgb([0, 0, 0])).save(&path).unwrap();
      path
    }
  }

  #[test]
  fn writes_both_outputs() {
    let ws = Workspace::new();
    let json = ws.detections(
      r#"{"results":{"detections":[
        {"class":6,"confidence":0.87,"bbox":[10.6,20.2,50.9,80.1]},
        {"class":8,"confidence":0.4}
      ]}}"#,
    );
    let image = ws.image();

    let report = AnnotateTask::new(&json, &image).unwrap().run().unwrap();
    assert_eq!(report.raw_count, 2);
    assert_eq!(report.kept_count, 1);
    assert_eq!(report.json_path, ws.root.join("jsons").join("frame_processed.json"));
    assert_eq!(report.image_path, ws.root.join("images").join("frame.jpg"));
    assert!(report.json_path.exists());
    assert!(report.image_path.exists());
  }

  #[test]
  fn missing_image_writes_nothing() {
    let ws = Workspace::new();
    let json = ws.detections(r#"{"results":{"detections":[]}}"#);
    let image = ws.root.join("uploads").join("missing.png");

    let task = AnnotateTask::new(&json, &image).unwrap();
    let json_out = task.layout().json_path().to_path_buf();
    let err = task.run().unwrap_err();

    assert!(matches!(
      err,
      TaskError::Input(InputError::NotFound {
        kind: InputKind::Image,
        ..
      })
    ));
    assert!(err.to_string().contains("missing.png"));
    assert!(!json_out.exists());
    assert!(!ws.root.join("images").exists());
  }

  #[test]
  fn undecodable_image_leaves_json_behind() {
    let ws = Workspace::new();
    let json = ws.detections(r#"{"results":{"detections":[]}}"#);
    let image = ws.root.join("uploads").join("broken.jpg");
    std::fs::write(&image, b"\xff\xd8 truncated").unwrap();

    let task = AnnotateTask::new(&json, &image).unwrap();
    let json_out = task.layout().json_path().to_path_buf();
    let image_out = task.layout().image_path().to_path_buf();
    let err = task.run().unwrap_err();

    assert!(matches!(err, TaskError::Input(InputError::ImageFileInputError(_))));
    assert!(err.to_string().contains("broken.jpg"));
    assert_eq!(std::fs::read_to_string(json_out).unwrap(), "[]");
    assert!(!image_out.exists());
  }

  #[test]
  fn invalid_json_is_fatal() {
    let ws = Workspace::new();
    let json = ws.detections("{ not json");
    let image = ws.image();

    let task = AnnotateTask::new(&json, &image).unwrap();
    let json_out = task.layout().json_path().to_path_buf();
    let err = task.run().unwrap_err();
    assert!(matches!(err, TaskError::Input(InputError::DetectionFileInputError(_))));
    assert!(!json_out.exists());
  }
}
