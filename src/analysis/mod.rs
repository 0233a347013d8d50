//! 行为信号分析
//!
//! ## 模块
//! - `landmarks`: 关键点数据模型与固定下标
//! - `ear`: EAR 眼部纵横比计算
//! - `pose`: 朝向与坐立姿态分类
//! - `sleep`: 入睡判定状态机（按会话持有）
//! - `pipeline`: 单帧分析流程
//! - `config`: 各阈值配置

pub mod config;
pub mod ear;
pub mod landmarks;
pub mod pipeline;
pub mod pose;
pub mod sleep;

pub use config::AnalysisConfig;
pub use landmarks::{Detections, Landmark, LandmarkSet};
pub use pipeline::{AnalysisResult, FramePipeline};
pub use sleep::{SessionState, SleepDebouncer, SleepStatus};
