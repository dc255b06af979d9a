//! 按人类走法分布抽样

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use protocol::{Distribution, GameState, MoveLikelihood};
use rand::distributions::{Distribution as _, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::MoveSelector;
use crate::error::Result;
use crate::oracle::PolicyOracle;

/// 模拟人类棋手：按走法分布引擎给出的概率抽样
pub struct SamplingSelector {
    name: String,
    predictor: Arc<dyn PolicyOracle>,
    rng: Mutex<ChaCha8Rng>,
    greedy: bool,
}

impl SamplingSelector {
    pub fn new(name: impl Into<String>, predictor: Arc<dyn PolicyOracle>) -> Self {
        Self::with_rng(name, predictor, ChaCha8Rng::from_entropy())
    }

    /// 固定种子，便于复现对局
    pub fn with_seed(name: impl Into<String>, predictor: Arc<dyn PolicyOracle>, seed: u64) -> Self {
        Self::with_rng(name, predictor, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(name: impl Into<String>, predictor: Arc<dyn PolicyOracle>, rng: ChaCha8Rng) -> Self {
        Self {
            name: name.into(),
            predictor,
            rng: Mutex::new(rng),
            greedy: false,
        }
    }

    /// 总是选择概率最高的走法
    pub fn greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    fn draw(&self, weights: &[f64]) -> Option<usize> {
        let index = match WeightedIndex::new(weights) {
            Ok(index) => index,
            Err(e) => {
                warn!("{}: cannot sample from {:?}: {}", self.name, weights, e);
                return None;
            }
        };
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Some(index.sample(&mut *rng))
    }
}

#[async_trait]
impl<G: GameState> MoveSelector<G> for SamplingSelector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn select_move(&self, state: &G) -> Result<Option<G::Move>> {
        let reported = self.predictor.distribution(&state.fingerprint()).await?;

        // 只保留当前局面能解析的走法
        let usable = Distribution::from_unsorted(reported.iter().filter_map(|entry| {
            match state.decode_move(&entry.mv) {
                Some(_) => Some(MoveLikelihood::new(entry.mv.clone(), entry.likelihood)),
                None => {
                    debug!("{}: dropping undecodable move {}", self.name, entry.mv);
                    None
                }
            }
        }));

        let chosen = if self.greedy {
            usable.top()
        } else {
            let Some(weights) = usable.normalized() else {
                debug!("{}: no probability mass to sample from", self.name);
                return Ok(None);
            };
            self.draw(&weights).and_then(|i| usable.iter().nth(i))
        };

        let Some(entry) = chosen else {
            return Ok(None);
        };
        info!(
            "{}: picked {} (p={:.3})",
            self.name, entry.mv, entry.likelihood
        );
        Ok(state.decode_move(&entry.mv))
    }
}
