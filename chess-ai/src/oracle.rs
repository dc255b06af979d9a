//! 外部分析服务接口
//!
//! 两类服务都以局面指纹（FEN）为输入，每次查询相互独立。

use async_trait::async_trait;
use protocol::{Distribution, EngineAnalysis};

use crate::error::Result;

/// 评估服务：局面 → 白方视角评分 + 推荐走法
#[async_trait]
pub trait EvalOracle: Send + Sync {
    async fn analyse(&self, fen: &str) -> Result<EngineAnalysis>;
}

/// 走法分布服务：局面 → 按概率降序排列的（走法, 概率）
#[async_trait]
pub trait PolicyOracle: Send + Sync {
    async fn distribution(&self, fen: &str) -> Result<Distribution>;
}
