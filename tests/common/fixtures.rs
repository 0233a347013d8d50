use std::io::Cursor;

use futures::future::BoxFuture;
use futures::FutureExt;
use image::{ImageFormat, RgbImage};

use behavior_backend::analysis::landmarks::{body, face, Landmark, LandmarkSet};
use behavior_backend::frame::DecodedFrame;
use behavior_backend::services::perception::{PerceptionEngine, PerceptionError};

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([40, 80, 120]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}

/// 正面、站立的身体关键点
pub fn upright_body() -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.5); 33];
    points[body::NOSE] = Landmark::new(0.5, 0.2);
    points[body::LEFT_EAR] = Landmark::new(0.6, 0.2);
    points[body::RIGHT_EAR] = Landmark::new(0.4, 0.2);
    points[body::LEFT_SHOULDER] = Landmark::new(0.6, 0.3);
    points[body::RIGHT_SHOULDER] = Landmark::new(0.4, 0.3);
    points[body::LEFT_HIP] = Landmark::new(0.55, 0.45);
    points[body::RIGHT_HIP] = Landmark::new(0.45, 0.45);
    LandmarkSet::new(points)
}

/// 构造双眼 EAR 均为 `ear` 的 468 点人脸网格
pub fn face_with_ear(ear: f64) -> LandmarkSet {
    // 眼宽 0.1，EAR = 4h / 0.2
    let half_height = ear * 0.05;
    let mut points = vec![Landmark::new(0.5, 0.5); 468];
    for (indices, cx) in [(face::LEFT_EYE, 0.4), (face::RIGHT_EYE, 0.6)] {
        let eye = [
            (cx - 0.05, 0.5),
            (cx - 0.02, 0.5 - half_height),
            (cx + 0.02, 0.5 - half_height),
            (cx + 0.05, 0.5),
            (cx + 0.02, 0.5 + half_height),
            (cx - 0.02, 0.5 + half_height),
        ];
        for (idx, (x, y)) in indices.iter().zip(eye) {
            points[*idx] = Landmark::new(x, y);
        }
    }
    LandmarkSet::new(points)
}

/// 以图像宽度编码检测结果：宽度 10 → 闭眼，宽度 20 → 睁眼，宽度 30 → 仅身体无人脸
pub struct WidthKeyedPerception;

pub const CLOSED_EYES_WIDTH: u32 = 10;
pub const OPEN_EYES_WIDTH: u32 = 20;
pub const NO_FACE_WIDTH: u32 = 30;

impl PerceptionEngine for WidthKeyedPerception {
    fn detect_pose<'a>(
        &'a self,
        _frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        futures::future::ready(Ok(Some(upright_body()))).boxed()
    }

    fn detect_face<'a>(
        &'a self,
        frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        let face = match frame.dimensions().0 {
            CLOSED_EYES_WIDTH => Some(face_with_ear(0.1)),
            OPEN_EYES_WIDTH => Some(face_with_ear(0.4)),
            _ => None,
        };
        futures::future::ready(Ok(face)).boxed()
    }

    fn mode(&self) -> &'static str {
        "width-keyed"
    }
}

/// 总是失败的检测服务
pub struct FailingPerception;

impl PerceptionEngine for FailingPerception {
    fn detect_pose<'a>(
        &'a self,
        _frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        futures::future::ready(Err(PerceptionError::Timeout)).boxed()
    }

    fn detect_face<'a>(
        &'a self,
        _frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        futures::future::ready(Ok(None)).boxed()
    }

    fn mode(&self) -> &'static str {
        "failing"
    }
}
