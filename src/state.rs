use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use crate::analysis::FramePipeline;
use crate::config::Config;
use crate::services::perception::PerceptionEngine;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    pipeline: Arc<FramePipeline>,
    perception: Arc<dyn PerceptionEngine>,
    sessions: Arc<SessionCounter>,
    shutdown_tx: broadcast::Sender<()>,
    started_at: Instant,
}

/// 活跃会话计数，仅统计数量，不持有任何会话状态
#[derive(Debug, Default)]
pub struct SessionCounter {
    active: AtomicUsize,
    total: AtomicU64,
}

/// 会话占位，drop 时释放名额
#[derive(Debug)]
pub struct SessionSlot {
    counter: Arc<SessionCounter>,
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        self.counter.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SessionCounter {
    pub fn try_acquire(counter: &Arc<Self>, max: usize) -> Option<SessionSlot> {
        let current = counter.active.fetch_add(1, Ordering::SeqCst);
        if current >= max {
            counter.active.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        counter.total.fetch_add(1, Ordering::Relaxed);
        Some(SessionSlot {
            counter: Arc::clone(counter),
        })
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl AppState {
    pub fn new(
        config: &Config,
        perception: Arc<dyn PerceptionEngine>,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Self {
        Self {
            config: Arc::new(config.clone()),
            pipeline: Arc::new(FramePipeline::new(config.analysis.clone())),
            perception,
            sessions: Arc::new(SessionCounter::default()),
            shutdown_tx,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &Arc<FramePipeline> {
        &self.pipeline
    }

    pub fn perception(&self) -> &Arc<dyn PerceptionEngine> {
        &self.perception
    }

    pub fn sessions(&self) -> &Arc<SessionCounter> {
        &self.sessions
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
