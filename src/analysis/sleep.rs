//! 入睡判定状态机
//!
//! Awake → Asleep: 连续 N 帧 EAR 低于阈值
//! Asleep → Awake: 任意一帧 EAR 不低于阈值（立即恢复）
//!
//! 进入谨慎、退出立即。未检测到人脸的帧不驱动状态机。

use serde::Serialize;

use super::config::SleepConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepStatus {
    Asleep,
    Awake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTransition {
    FellAsleep,
    WokeUp,
}

/// 单个会话的判定状态，仅由该会话的任务持有
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub consecutive_low_ear_frames: u32,
    pub sleeping: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SleepStatus {
        if self.sleeping {
            SleepStatus::Asleep
        } else {
            SleepStatus::Awake
        }
    }
}

#[derive(Debug, Clone)]
pub struct SleepDebouncer {
    config: SleepConfig,
}

impl SleepDebouncer {
    pub fn new(config: SleepConfig) -> Self {
        Self { config }
    }

    /// 输入一帧的 EAR，返回本帧发生的状态转换（如有）
    ///
    /// NaN 与阈值比较恒为 false，因此按睁眼处理。
    pub fn update(&self, state: &mut SessionState, ear: f64) -> Option<SleepTransition> {
        let was_sleeping = state.sleeping;

        if ear < self.config.ear_threshold {
            state.consecutive_low_ear_frames = state.consecutive_low_ear_frames.saturating_add(1);
            if state.consecutive_low_ear_frames >= self.config.consecutive_frames {
                state.sleeping = true;
            }
        } else {
            state.consecutive_low_ear_frames = 0;
            state.sleeping = false;
        }

        tracing::debug!(
            ear,
            count = state.consecutive_low_ear_frames,
            sleeping = state.sleeping,
            "EAR sample"
        );

        let transition = match (was_sleeping, state.sleeping) {
            (false, true) => Some(SleepTransition::FellAsleep),
            (true, false) => Some(SleepTransition::WokeUp),
            _ => None,
        };

        match transition {
            Some(SleepTransition::FellAsleep) => tracing::info!(
                ear,
                count = state.consecutive_low_ear_frames,
                "Subject fell asleep"
            ),
            Some(SleepTransition::WokeUp) => tracing::info!(ear, "Subject woke up"),
            None => {}
        }

        transition
    }
}

impl Default for SleepDebouncer {
    fn default() -> Self {
        Self::new(SleepConfig::default())
    }
}
