use serde::{Serialize, Serializer};

use super::config::AnalysisConfig;
use super::ear::{apply_guard, binocular_ear};
use super::landmarks::Detections;
use super::pose::{classify_action, classify_direction, Action, Direction};
use super::sleep::{SessionState, SleepDebouncer, SleepStatus};
use crate::frame::DecodedFrame;
use crate::services::perception::{PerceptionEngine, PerceptionError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub direction: Direction,
    pub action: Action,
    pub sleep_status: SleepStatus,
    /// 双眼平均 EAR。`None` 表示本帧没有可用的眼部关键点，此时睡眠状态未更新。
    /// 退化眼型在直通模式下得到 ±inf/NaN，仍会参与睡眠判定，但序列化为 `null`，
    /// 与“无人脸”在线上无法区分；需要区分时启用 `EAR_GUARD=clamp`。
    #[serde(serialize_with = "serialize_ear")]
    pub ear: Option<f64>,
}

/// 保留三位小数；非有限值序列化为 null
fn serialize_ear<S: Serializer>(ear: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match ear {
        Some(v) if v.is_finite() => serializer.serialize_some(&round3(*v)),
        _ => serializer.serialize_none(),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// 单帧分析流程。自身无状态，所有可变状态由调用方传入。
#[derive(Debug, Clone)]
pub struct FramePipeline {
    config: AnalysisConfig,
    debouncer: SleepDebouncer,
}

impl FramePipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        let debouncer = SleepDebouncer::new(config.sleep.clone());
        Self { config, debouncer }
    }

    pub fn analyze(&self, detections: &Detections, session: &mut SessionState) -> AnalysisResult {
        let face_detected = detections.face.is_some();

        let (direction, action) = match &detections.pose {
            Some(body) => (
                classify_direction(face_detected, body, &self.config.pose),
                classify_action(body, &self.config.pose),
            ),
            None => (Direction::Unknown, Action::Unknown),
        };

        let ear = detections
            .face
            .as_ref()
            .and_then(binocular_ear)
            .map(|raw| apply_guard(raw, self.config.sleep.ear_guard));

        if let Some(ear) = ear {
            self.debouncer.update(session, ear);
        } else if face_detected {
            tracing::debug!("Face mesh too short for eye landmarks, skipping EAR");
        }

        AnalysisResult {
            direction,
            action,
            sleep_status: session.status(),
            ear,
        }
    }

    /// 向感知引擎并发请求身体与人脸关键点，再执行 [`FramePipeline::analyze`]
    pub async fn process_frame(
        &self,
        engine: &dyn PerceptionEngine,
        frame: &DecodedFrame,
        session: &mut SessionState,
    ) -> Result<AnalysisResult, PerceptionError> {
        let (pose, face) = futures::try_join!(engine.detect_pose(frame), engine.detect_face(frame))?;
        Ok(self.analyze(&Detections { pose, face }, session))
    }
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
