//! 关键点数据模型
//!
//! 感知引擎输出的关键点均为归一化图像坐标 (x, y ∈ [0,1])，y 轴向下。
//! 关键点只通过其在集合中的下标识别，下标语义由引擎约定。

use serde::{Deserialize, Serialize};

/// 身体关键点下标（33 点 pose 模型）
pub mod body {
    pub const NOSE: usize = 0;
    pub const LEFT_EAR: usize = 7;
    pub const RIGHT_EAR: usize = 8;
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
}

/// 面部网格（468 点）中的眼部 6 点下标
///
/// 顺序: 外眼角, 上眼睑1, 上眼睑2, 内眼角, 下眼睑1, 下眼睑2
pub mod face {
    pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
    pub const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// 平面欧氏距离，忽略 z
    pub fn distance(&self, other: &Landmark) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// 单个身体或单张人脸的有序关键点集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// 按固定下标切出眼部子集；任一下标越界返回 None
    pub fn eye(&self, indices: &[usize; 6]) -> Option<EyeLandmarks> {
        let mut points = [Landmark::new(0.0, 0.0); 6];
        for (slot, &idx) in points.iter_mut().zip(indices.iter()) {
            *slot = *self.points.get(idx)?;
        }
        Some(EyeLandmarks { points })
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

/// 单眼 6 点子集，点序与 EAR 公式中的角色一一对应
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeLandmarks {
    points: [Landmark; 6],
}

impl EyeLandmarks {
    pub fn new(points: [Landmark; 6]) -> Self {
        Self { points }
    }

    pub fn outer_corner(&self) -> &Landmark {
        &self.points[0]
    }

    pub fn upper_lid(&self) -> (&Landmark, &Landmark) {
        (&self.points[1], &self.points[2])
    }

    pub fn inner_corner(&self) -> &Landmark {
        &self.points[3]
    }

    pub fn lower_lid(&self) -> (&Landmark, &Landmark) {
        (&self.points[4], &self.points[5])
    }
}

/// 一帧的感知结果：至多一个身体、至多一张人脸
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detections {
    pub pose: Option<LandmarkSet>,
    pub face: Option<LandmarkSet>,
}
