//! 单个连接的会话处理
//!
//! 每个会话独占一份 [`SessionState`]，逐帧串行处理：解码 → 检测 → 分析 → 编码回复。
//! 单帧失败只跳过该帧，不会结束会话。

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::analysis::{AnalysisResult, FramePipeline, SessionState};
use crate::frame::decode_frame;
use crate::services::perception::PerceptionEngine;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReply {
    pub message: String,
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FrameFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameFailure {
    pub code: &'static str,
    pub message: String,
}

impl FrameReply {
    fn analyzed(size: usize, result: AnalysisResult) -> Self {
        Self {
            message: received_message(size),
            result: Some(result),
            error: None,
        }
    }

    fn skipped(size: usize, code: &'static str, message: String) -> Self {
        Self {
            message: received_message(size),
            result: None,
            error: Some(FrameFailure { code, message }),
        }
    }
}

fn received_message(size: usize) -> String {
    format!("{size} bytes received")
}

pub struct SessionHandler {
    id: Uuid,
    state: SessionState,
    pipeline: Arc<FramePipeline>,
    perception: Arc<dyn PerceptionEngine>,
    max_frame_bytes: usize,
    frames: u64,
    skipped: u64,
}

impl SessionHandler {
    pub fn new(
        pipeline: Arc<FramePipeline>,
        perception: Arc<dyn PerceptionEngine>,
        max_frame_bytes: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::new(),
            pipeline,
            perception,
            max_frame_bytes,
            frames: 0,
            skipped: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    #[tracing::instrument(skip_all, fields(session_id = %self.id, frame = self.frames + 1))]
    pub async fn handle_frame(&mut self, bytes: Vec<u8>) -> FrameReply {
        self.frames += 1;
        let size = bytes.len();

        let frame = match decode_frame(bytes, self.max_frame_bytes) {
            Ok(frame) => frame,
            Err(e) => {
                self.skipped += 1;
                tracing::warn!(size, error = %e, "Skipping undecodable frame");
                return FrameReply::skipped(size, e.code(), e.to_string());
            }
        };

        match self
            .pipeline
            .process_frame(self.perception.as_ref(), &frame, &mut self.state)
            .await
        {
            Ok(result) => FrameReply::analyzed(size, result),
            Err(e) => {
                self.skipped += 1;
                tracing::warn!(size, error = %e, "Perception failed, skipping frame");
                FrameReply::skipped(size, "PERCEPTION_UNAVAILABLE", e.to_string())
            }
        }
    }
}
