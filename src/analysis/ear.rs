//! EAR (Eye Aspect Ratio) 计算
//!
//! 标准 6 点公式: EAR = (|p1-p5| + |p2-p4|) / (2 * |p0-p3|)
//! - p0, p3: 眼角点（水平方向）
//! - p1, p2: 上眼睑点
//! - p4, p5: 下眼睑点
//!
//! 不对退化几何做校验：眼角距离趋近 0 时结果可能为极大值或 NaN，
//! 由调用方按 [`EarGuard`] 决定是否修正。

use super::config::EarGuard;
use super::landmarks::{face, EyeLandmarks, LandmarkSet};

pub fn compute_ear(eye: &EyeLandmarks) -> f64 {
    let (upper1, upper2) = eye.upper_lid();
    let (lower1, lower2) = eye.lower_lid();

    let vertical1 = upper1.distance(lower2);
    let vertical2 = upper2.distance(lower1);
    let horizontal = eye.outer_corner().distance(eye.inner_corner());

    (vertical1 + vertical2) / (2.0 * horizontal)
}

/// 双眼 EAR 平均值；面部关键点不足以切出双眼时返回 None
pub fn binocular_ear(face_set: &LandmarkSet) -> Option<f64> {
    let left = face_set.eye(&face::LEFT_EYE)?;
    let right = face_set.eye(&face::RIGHT_EYE)?;
    Some((compute_ear(&left) + compute_ear(&right)) / 2.0)
}

pub fn apply_guard(ear: f64, guard: EarGuard) -> f64 {
    match guard {
        EarGuard::PassThrough => ear,
        EarGuard::Clamp if !ear.is_finite() => 0.0,
        EarGuard::Clamp => ear,
    }
}
