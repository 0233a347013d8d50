use serde::{Deserialize, Serialize};

use crate::config::{env_or, env_or_parse};

/// EAR 分母退化（眼角距离≈0）时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum EarGuard {
    /// 原样透传极端值 / NaN
    #[default]
    PassThrough,
    /// 非有限值归零，按闭眼处理
    Clamp,
}

impl EarGuard {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pass" | "passthrough" | "pass-through" | "none" => Some(Self::PassThrough),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepConfig {
    /// 低于此 EAR 视为闭眼
    pub ear_threshold: f64,
    /// 连续闭眼帧数达到该值才判定入睡
    pub consecutive_frames: u32,
    #[serde(default)]
    pub ear_guard: EarGuard,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.3,
            consecutive_frames: 8,
            ear_guard: EarGuard::PassThrough,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseConfig {
    /// 髋部与肩部平均 y 差值超过此值判为坐姿（严格大于）
    pub sitting_gap: f64,
    /// 鼻尖偏离双耳中点的最大距离（正面）
    pub front_center_tolerance: f64,
    /// 双耳水平间距下限（正面）
    pub front_min_ear_spread: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            sitting_gap: 0.25,
            front_center_tolerance: 0.02,
            front_min_ear_spread: 0.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub sleep: SleepConfig,
    pub pose: PoseConfig,
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let ear_guard = match EarGuard::parse(&env_or("EAR_GUARD", "pass")) {
            Some(guard) => guard,
            None => {
                tracing::warn!("Unknown EAR_GUARD value, using pass-through");
                EarGuard::PassThrough
            }
        };

        let mut consecutive_frames =
            env_or_parse("SLEEP_CONSEC_FRAMES", defaults.sleep.consecutive_frames);
        if consecutive_frames == 0 {
            tracing::warn!("SLEEP_CONSEC_FRAMES must be at least 1, using 1");
            consecutive_frames = 1;
        }

        Self {
            sleep: SleepConfig {
                ear_threshold: env_or_parse("EAR_THRESHOLD", defaults.sleep.ear_threshold),
                consecutive_frames,
                ear_guard,
            },
            pose: PoseConfig {
                sitting_gap: env_or_parse("SITTING_GAP", defaults.pose.sitting_gap),
                front_center_tolerance: env_or_parse(
                    "FRONT_CENTER_TOLERANCE",
                    defaults.pose.front_center_tolerance,
                ),
                front_min_ear_spread: env_or_parse(
                    "FRONT_MIN_EAR_SPREAD",
                    defaults.pose.front_min_ear_spread,
                ),
            },
        }
    }
}
