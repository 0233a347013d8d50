//! 姿态分类
//!
//! 基于身体关键点的启发式判断：
//! - 朝向：鼻尖相对双耳的水平位置
//! - 动作：肩部与髋部的垂直间距（y 轴向下）

use serde::Serialize;

use super::config::PoseConfig;
use super::landmarks::{body, LandmarkSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Front,
    Back,
    Left,
    Right,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Sitting,
    Standing,
    Unknown,
}

pub fn classify_action(landmarks: &LandmarkSet, config: &PoseConfig) -> Action {
    let (Some(ls), Some(rs), Some(lh), Some(rh)) = (
        landmarks.get(body::LEFT_SHOULDER),
        landmarks.get(body::RIGHT_SHOULDER),
        landmarks.get(body::LEFT_HIP),
        landmarks.get(body::RIGHT_HIP),
    ) else {
        return Action::Unknown;
    };

    let shoulder_y = (ls.y + rs.y) / 2.0;
    let hip_y = (lh.y + rh.y) / 2.0;

    if hip_y - shoulder_y > config.sitting_gap {
        Action::Sitting
    } else {
        Action::Standing
    }
}

/// 未检测到人脸时认为背对镜头
pub fn classify_direction(
    face_detected: bool,
    landmarks: &LandmarkSet,
    config: &PoseConfig,
) -> Direction {
    if !face_detected {
        return Direction::Back;
    }

    let (Some(nose), Some(left_ear), Some(right_ear)) = (
        landmarks.get(body::NOSE),
        landmarks.get(body::LEFT_EAR),
        landmarks.get(body::RIGHT_EAR),
    ) else {
        return Direction::Unknown;
    };

    let center_diff = (nose.x - (left_ear.x + right_ear.x) / 2.0).abs();
    let ear_spread = (left_ear.x - right_ear.x).abs();

    if center_diff < config.front_center_tolerance && ear_spread > config.front_min_ear_spread {
        Direction::Front
    } else if nose.x < left_ear.x && nose.x < right_ear.x {
        Direction::Right
    } else if nose.x > left_ear.x && nose.x > right_ear.x {
        Direction::Left
    } else {
        Direction::Unknown
    }
}
