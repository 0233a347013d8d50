use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::analysis::AnalysisConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub static_dir: String,
    pub limits: SessionLimits,
    pub perception: PerceptionConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub max_frame_bytes: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 64,
            max_frame_bytes: 4 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerceptionConfig {
    /// 远程关键点服务地址，未设置时禁用检测
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let limits = SessionLimits::default();
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 8000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            static_dir: env_or("STATIC_DIR", "static"),
            limits: SessionLimits {
                max_sessions: env_or_parse("MAX_SESSIONS", limits.max_sessions),
                max_frame_bytes: env_or_parse("MAX_FRAME_BYTES", limits.max_frame_bytes),
            },
            perception: PerceptionConfig {
                url: env::var("PERCEPTION_URL").ok().filter(|v| !v.trim().is_empty()),
                timeout_secs: env_or_parse("PERCEPTION_TIMEOUT_SECS", 5_u64),
            },
            analysis: AnalysisConfig::from_env(),
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
