// 该文件是 Insulens （绝缘子标注） 项目的一部分。
// src/output/draw.rs - 检测结果可视化
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

use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use thiserror::Error;

use crate::model::{DetectItem, DetectResult, WithLabel};

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

const BOX_COLOR: [u8; 3] = [0, 255, 0]; // 绿色
const BOX_THICKNESS: u32 = 2;
const LABEL_FONT_SIZE: f32 = 16.0;
const LABEL_OFFSET_Y: i32 = 10;
const LABEL_WEIGHT: i32 = 2;
/// 画布外保留的余量，大于字形超出 `text_size` 的部分
const OFFSCREEN_MARGIN: i64 = 16;

#[derive(Error, Debug)]
pub enum DrawError {
  #[error("无法加载嵌入的字体文件: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
}

pub struct Draw {
  font: FontRef<'static>,
  font_scale: PxScale,
  color: Rgb<u8>,
  thickness: u32,
  label_offset_y: i32,
}

impl Draw {
  pub fn new() -> Result<Self, DrawError> {
    let font = FontRef::try_from_slice(FONT_DATA)?;

    Ok(Self {
      font,
      font_scale: PxScale::from(LABEL_FONT_SIZE),
      color: Rgb(BOX_COLOR),
      thickness: BOX_THICKNESS,
      label_offset_y: LABEL_OFFSET_Y,
    })
  }

  /// 绘制 `(x1, y1)` 到 `(x2, y2)` 的空心矩形，两角均包含在内
  ///
  /// 各边收拢到 `[-1, 宽]` × `[-1, 高]` 内再交给 imageproc，图像内的像素不变。
  fn draw_bbox(&self, image: &mut RgbImage, bbox: &[i64; 4]) {
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));
    let [x1, y1, x2, y2] = *bbox;
    let (left, right) = (x1.min(x2), x1.max(x2));
    let (top, bottom) = (y1.min(y2), y1.max(y2));

    // 线宽由内缩的多个 1 像素矩形叠加而成
    for t in 0..i64::from(self.thickness) {
      let (l, r) = (left.saturating_add(t), right.saturating_sub(t));
      let (tp, b) = (top.saturating_add(t), bottom.saturating_sub(t));
      if l > r || tp > b {
        break;
      }

      let (l, r) = (l.clamp(-1, width), r.clamp(-1, width));
      let (tp, b) = (tp.clamp(-1, height), b.clamp(-1, height));
      let rect = Rect::at(saturate_i32(l), saturate_i32(tp))
        .of_size(saturate_extent(r - l + 1), saturate_extent(b - tp + 1));
      draw_hollow_rect_mut(image, rect, self.color);
    }
  }

  /// `(x, y)` 为文字左下角，与 OpenCV `putText` 的原点相同
  ///
  /// 原点收拢到图像周围的余量内，完全不可见的文字收拢后依然不可见。
  fn draw_label(&self, image: &mut RgbImage, x: i64, y: i64, text: &str) {
    let (text_width, text_height) = text_size(self.font_scale, &self.font, text);
    let (text_width, text_height) = (i64::from(text_width), i64::from(text_height));

    let x = x.clamp(
      -text_width - OFFSCREEN_MARGIN,
      i64::from(image.width()) + OFFSCREEN_MARGIN,
    );
    let y = y.clamp(
      -OFFSCREEN_MARGIN,
      i64::from(image.height()) + text_height + OFFSCREEN_MARGIN,
    );
    let (x, top) = (saturate_i32(x), saturate_i32(y - text_height));

    for dx in 0..LABEL_WEIGHT {
      draw_text_mut(
        image,
        self.color,
        x.saturating_add(dx),
        top,
        self.font_scale,
        &self.font,
        text,
      );
    }
  }

  fn draw_item<T: WithLabel>(&self, image: &mut RgbImage, item: &DetectItem<T>) {
    self.draw_bbox(image, &item.bbox);

    let [x1, y1, ..] = item.bbox;
    self.draw_label(
      image,
      x1,
      y1.saturating_sub(i64::from(self.label_offset_y)),
      &label_text(item),
    );
  }
}

/// `"<标签> <置信度保留两位小数>"`
pub fn label_text<T: WithLabel>(item: &DetectItem<T>) -> String {
  format!("{} {:.2}", item.kind.to_label_str(), item.score_f64())
}

fn saturate_i32(v: i64) -> i32 {
  v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// 限制在 `i32::MAX` 以内，保证 `Rect` 右、下边界不溢出
fn saturate_extent(v: i64) -> u32 {
  v.clamp(1, i32::MAX as i64) as u32
}

pub trait DrawDetectionOnImage<T: WithLabel> {
  fn draw_detections_on_image(&self, image: &mut RgbImage, result: &DetectResult<T>);
}

impl<T: WithLabel> DrawDetectionOnImage<T> for Draw {
  fn draw_detections_on_image(&self, image: &mut RgbImage, result: &DetectResult<T>) {
    // 按列表顺序绘制，后者覆盖前者
    for item in result.items.iter() {
      self.draw_item(image, item);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::InsulatorLabel;
  use serde_json::Number;

  const GREEN: Rgb<u8> = Rgb(BOX_COLOR);
  const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

  fn item(bbox: [i64; 4], score: f64) -> DetectItem<InsulatorLabel> {
    DetectItem {
      kind: InsulatorLabel::Insulator,
      score: Number::from_f64(score).unwrap(),
      bbox,
    }
  }

  fn result(items: Vec<DetectItem<InsulatorLabel>>) -> DetectResult<InsulatorLabel> {
    items.into_iter().collect()
  }

  #[test]
  fn label_text_uses_two_decimals() {
    assert_eq!(label_text(&item([0, 0, 1, 1], 0.87)), "insulator 0.87");
    assert_eq!(label_text(&item([0, 0, 1, 1], 0.5)), "insulator 0.50");
    assert_eq!(label_text(&item([0, 0, 1, 1], 1.0)), "insulator 1.00");
  }

  #[test]
  fn empty_result_leaves_image_untouched() {
    let draw = Draw::new().unwrap();
    let original = RgbImage::from_pixel(32, 32, Rgb([40, 50, 60]));
    let mut image = original.clone();
    draw.draw_detections_on_image(&mut image, &DetectResult::<InsulatorLabel>::default());
    assert_eq!(image, original);
  }

  #[test]
  fn box_edges_are_two_pixels_wide() {
    let draw = Draw::new().unwrap();
    let mut image = RgbImage::from_pixel(100, 100, BLACK);
    draw.draw_detections_on_image(&mut image, &result(vec![item([20, 40, 60, 80], 0.9)]));

    // 左边与下边，包括两角
    assert_eq!(image.get_pixel(20, 60), &GREEN);
    assert_eq!(image.get_pixel(21, 60), &GREEN);
    assert_eq!(image.get_pixel(22, 60), &BLACK);
    assert_eq!(image.get_pixel(60, 80), &GREEN);
    assert_eq!(image.get_pixel(40, 80), &GREEN);
    assert_eq!(image.get_pixel(40, 79), &GREEN);
    assert_eq!(image.get_pixel(40, 78), &BLACK);
    // 内部不填充
    assert_eq!(image.get_pixel(40, 60), &BLACK);
  }

  #[test]
  fn label_is_drawn_above_the_box() {
    let draw = Draw::new().unwrap();
    let mut image = RgbImage::from_pixel(200, 100, BLACK);
    draw.draw_detections_on_image(&mut image, &result(vec![item([20, 60, 150, 90], 0.9)]));

    // 文字左下角位于 y = 50，文字全部落在其上方
    let text_pixels = (20..150)
      .flat_map(|x| (0..50).map(move |y| (x, y)))
      .filter(|&(x, y)| image.get_pixel(x, y) != &BLACK)
      .count();
    assert!(text_pixels > 0);

    let between = (24..150)
      .flat_map(|x| (51..60).map(move |y| (x, y)))
      .filter(|&(x, y)| image.get_pixel(x, y) != &BLACK)
      .count();
    assert_eq!(between, 0);
  }

  #[test]
  fn inverted_and_out_of_bounds_boxes_do_not_panic() {
    let draw = Draw::new().unwrap();
    let mut image = RgbImage::from_pixel(50, 50, BLACK);
    draw.draw_detections_on_image(
      &mut image,
      &result(vec![
        item([40, 40, 10, 10], 0.1),
        item([-30, -30, 500, 500], 0.2),
        item([5, 5, 5, 5], 0.3),
        item([-900, -900, -100, -100], 0.4),
      ]),
    );

    // 颠倒的角点仍然画出同一矩形
    assert_eq!(image.get_pixel(10, 25), &GREEN);
    assert_eq!(image.get_pixel(40, 25), &GREEN);
    // 单点框
    assert_eq!(image.get_pixel(5, 5), &GREEN);
  }

  #[test]
  fn huge_boxes_are_drawn_within_the_image() {
    let draw = Draw::new().unwrap();
    let mut image = RgbImage::from_pixel(64, 64, BLACK);
    draw.draw_detections_on_image(
      &mut image,
      &result(vec![
        item([0, 0, 4_000_000_000, 4_000_000_000], 0.5),
        item([-4_000_000_000, 10, 4_000_000_000, 20], 0.5),
      ]),
    );

    // 左边与上边可见，右边与下边在图像外
    assert_eq!(image.get_pixel(0, 32), &GREEN);
    assert_eq!(image.get_pixel(1, 32), &GREEN);
    assert_eq!(image.get_pixel(32, 0), &GREEN);
    assert_eq!(image.get_pixel(63, 32), &BLACK);
    assert_eq!(image.get_pixel(32, 63), &BLACK);
    // 横贯图像的窄框只剩上下两条边
    assert_eq!(image.get_pixel(40, 10), &GREEN);
    assert_eq!(image.get_pixel(40, 20), &GREEN);
    assert_eq!(image.get_pixel(40, 15), &BLACK);
  }

  #[test]
  fn boxes_far_outside_leave_image_untouched() {
    let draw = Draw::new().unwrap();
    let original = RgbImage::from_pixel(64, 64, BLACK);
    let mut image = original.clone();
    draw.draw_detections_on_image(
      &mut image,
      &result(vec![
        item([-4_000_000_000, -4_000_000_000, -10, -10], 0.5),
        item([4_000_000_000, 4_000_000_000, 8_000_000_000, 8_000_000_000], 0.5),
        item([i64::MIN, i64::MIN, i64::MIN, i64::MIN], 0.5),
        item([i64::MAX, i64::MAX, i64::MAX, i64::MAX], 0.5),
      ]),
    );
    assert_eq!(image, original);
  }

  #[test]
  fn later_detections_draw_on_top() {
    let mut image = RgbImage::from_pixel(60, 60, BLACK);
    let mut red_draw = Draw::new().unwrap();
    red_draw.color = Rgb([255, 0, 0]);
    red_draw.draw_detections_on_image(&mut image, &result(vec![item([10, 10, 40, 40], 0.1)]));
    let draw = Draw::new().unwrap();
    draw.draw_detections_on_image(&mut image, &result(vec![item([10, 10, 40, 40], 0.1)]));
    assert_eq!(image.get_pixel(10, 25), &GREEN);
  }
}
