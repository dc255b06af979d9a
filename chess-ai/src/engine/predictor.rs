//! 走法分布引擎（lc0 + Maia 权重）
//!
//! lc0 在 `--verbose-move-stats` 模式下为每个候选走法输出一行
//! `info string <move> (...) (P: xx.xx%) ...`，另有一行以 `node` 开头的汇总。

use async_trait::async_trait;
use protocol::{parse_move_stat, Distribution};
use tracing::debug;

use super::{EngineConfig, UciSession};
use crate::error::Result;
use crate::oracle::PolicyOracle;

/// 通过 UCI 进程获取走法概率分布
pub struct UciPredictor {
    config: EngineConfig,
}

impl UciPredictor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PolicyOracle for UciPredictor {
    async fn distribution(&self, fen: &str) -> Result<Distribution> {
        let mut session = UciSession::launch(&self.config).await?;

        let mut entries = Vec::new();
        session
            .analyse(fen, self.config.limit, |info| {
                if let Some(stat) = info.string.as_deref().and_then(parse_move_stat) {
                    entries.push(stat);
                }
            })
            .await?;
        session.quit().await?;

        let distribution = Distribution::from_unsorted(entries);
        debug!(
            "Predicted {} moves for {} (mass {:.3})",
            distribution.len(),
            fen,
            distribution.total_mass()
        );
        Ok(distribution)
    }
}
