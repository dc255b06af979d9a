//! 根据配置创建走法选择器

use std::sync::Arc;

use chess_ai::{
    EngineSelector, EvalOracle, ExpectimaxSelector, MoveSelector, PolicyOracle, SamplingSelector,
    UciEvaluator, UciPredictor,
};
use protocol::shakmaty::Chess;
use tracing::info;

use crate::config::{ArenaConfig, PlayerConfig, PlayerKind};

/// 两位玩家共享的引擎客户端
#[derive(Clone)]
pub struct Oracles {
    pub evaluator: Arc<dyn EvalOracle>,
    pub predictor: Arc<dyn PolicyOracle>,
}

impl Oracles {
    pub fn from_config(config: &ArenaConfig) -> Self {
        Self {
            evaluator: Arc::new(UciEvaluator::new(config.evaluator.clone())),
            predictor: Arc::new(UciPredictor::new(config.predictor.clone())),
        }
    }
}

/// 创建一方的选择器
pub fn build_selector(player: &PlayerConfig, oracles: &Oracles) -> Arc<dyn MoveSelector<Chess>> {
    info!("Player {}: {:?}", player.name, player.kind);

    match player.kind {
        PlayerKind::Engine => Arc::new(EngineSelector::new(
            player.name.clone(),
            Arc::clone(&oracles.evaluator),
        )),
        PlayerKind::Expectimax => Arc::new(ExpectimaxSelector::new(
            player.name.clone(),
            Arc::clone(&oracles.evaluator),
            Arc::clone(&oracles.predictor),
            player.mode,
        )),
        PlayerKind::Sampling => {
            let predictor = Arc::clone(&oracles.predictor);
            let selector = match player.seed {
                Some(seed) => SamplingSelector::with_seed(player.name.clone(), predictor, seed),
                None => SamplingSelector::new(player.name.clone(), predictor),
            };
            Arc::new(selector.greedy(player.greedy))
        }
    }
}
