use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;

use crate::analysis::landmarks::{Detections, LandmarkSet};
use crate::config::PerceptionConfig;
use crate::frame::DecodedFrame;

/// 关键点检测能力：给定一帧，返回至多一组身体关键点 / 至多一张人脸网格
pub trait PerceptionEngine: Send + Sync {
    fn detect_pose<'a>(
        &'a self,
        frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>>;

    fn detect_face<'a>(
        &'a self,
        frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>>;

    fn mode(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum PerceptionError {
    #[error("perception request timed out")]
    Timeout,
    #[error("perception network error: {0}")]
    Network(String),
    #[error("perception api error: status={status}, message={message}")]
    ApiError { status: u16, message: String },
    #[error("perception response invalid: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PerceptionError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            PerceptionError::Timeout
        } else if value.is_decode() {
            PerceptionError::InvalidResponse(value.to_string())
        } else {
            PerceptionError::Network(value.to_string())
        }
    }
}

pub fn build_engine(config: &PerceptionConfig) -> Arc<dyn PerceptionEngine> {
    match config.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => {
            tracing::info!(url, "Using remote landmark service");
            Arc::new(HttpPerceptionEngine::new(url, config.timeout_secs))
        }
        None => {
            tracing::warn!("PERCEPTION_URL not set, landmark detection disabled");
            Arc::new(DisabledPerception)
        }
    }
}

#[derive(Debug, Deserialize)]
struct LandmarkResponse {
    #[serde(default)]
    landmarks: Option<LandmarkSet>,
}

/// 远程关键点服务：`POST {base}/pose`、`POST {base}/face`，请求体为原始编码图像
#[derive(Debug, Clone)]
pub struct HttpPerceptionEngine {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPerceptionEngine {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn endpoint(&self, kind: &str) -> String {
        format!("{}/{kind}", self.base_url)
    }

    async fn request(
        &self,
        kind: &str,
        frame: &DecodedFrame,
    ) -> Result<Option<LandmarkSet>, PerceptionError> {
        let response = self
            .client
            .post(self.endpoint(kind))
            .header(reqwest::header::CONTENT_TYPE, frame.mime_type())
            .body(frame.encoded().to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PerceptionError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: LandmarkResponse = response.json().await?;
        Ok(body.landmarks.filter(|set| !set.is_empty()))
    }
}

impl PerceptionEngine for HttpPerceptionEngine {
    fn detect_pose<'a>(
        &'a self,
        frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        self.request("pose", frame).boxed()
    }

    fn detect_face<'a>(
        &'a self,
        frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        self.request("face", frame).boxed()
    }

    fn mode(&self) -> &'static str {
        "remote"
    }
}

/// 未配置检测服务时使用：任何帧都没有检测结果
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPerception;

impl PerceptionEngine for DisabledPerception {
    fn detect_pose<'a>(
        &'a self,
        _frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        futures::future::ready(Ok(None)).boxed()
    }

    fn detect_face<'a>(
        &'a self,
        _frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        futures::future::ready(Ok(None)).boxed()
    }

    fn mode(&self) -> &'static str {
        "disabled"
    }
}

/// 对每一帧都返回同一组检测结果，用于离线调试与测试
#[derive(Debug, Clone, Default)]
pub struct FixedPerception {
    detections: Detections,
}

impl FixedPerception {
    pub fn new(detections: Detections) -> Self {
        Self { detections }
    }
}

impl PerceptionEngine for FixedPerception {
    fn detect_pose<'a>(
        &'a self,
        _frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        futures::future::ready(Ok(self.detections.pose.clone())).boxed()
    }

    fn detect_face<'a>(
        &'a self,
        _frame: &'a DecodedFrame,
    ) -> BoxFuture<'a, Result<Option<LandmarkSet>, PerceptionError>> {
        futures::future::ready(Ok(self.detections.face.clone())).boxed()
    }

    fn mode(&self) -> &'static str {
        "fixed"
    }
}
