//! 走法选择器
//!
//! 对局控制只依赖 [`MoveSelector`]，不关心具体实现：
//! - [`EngineSelector`]：直接采用评估引擎的最佳走法
//! - [`ExpectimaxSelector`]：按人类走法分布加权的期望评分选择
//! - [`SamplingSelector`]：按人类走法分布随机抽样

mod cache;
mod engine;
mod expectimax;
mod sampling;

use async_trait::async_trait;
use protocol::GameState;

use crate::error::Result;

pub use cache::DecisionCache;
pub use engine::EngineSelector;
pub use expectimax::{expected_value, ExpectimaxSelector};
pub use sampling::SamplingSelector;

/// 走法选择能力
///
/// 返回 `Ok(None)` 表示没有可走的棋，调用方应将其视为终局而不是错误。
#[async_trait]
pub trait MoveSelector<G: GameState>: Send + Sync {
    /// 玩家名称（写入棋谱）
    fn name(&self) -> &str;

    async fn select_move(&self, state: &G) -> Result<Option<G::Move>>;
}
