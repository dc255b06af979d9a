//! 期望加权走法选择
//!
//! 对每个候选走法，用走法分布引擎预测对手的回应，
//! 以回应概率加权对手走后局面的评分，选择期望评分最优的走法。
//!
//! 流程：
//! 1. 根局面已有利于走子方的将杀时，直接采用评估引擎的走法
//! 2. 展开所有合法走法，局面去重后批量查询对手的走法分布
//! 3. 收集第一层与回应后的局面，去重后批量查询评分
//! 4. 第一层出现有利将杀时立即返回该走法，否则按期望评分选择

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use protocol::{GameState, Side};
use tracing::{debug, info, warn};

use super::{DecisionCache, MoveSelector};
use crate::batch::{query_batch, QueryMode};
use crate::error::Result;
use crate::oracle::{EvalOracle, PolicyOracle};

/// 第一层局面 → 回应后的 (概率, 局面指纹)
type FollowUps = HashMap<String, Vec<(f32, String)>>;

/// 期望加权选择器
pub struct ExpectimaxSelector {
    name: String,
    evaluator: Arc<dyn EvalOracle>,
    predictor: Arc<dyn PolicyOracle>,
    mode: QueryMode,
}

impl ExpectimaxSelector {
    pub fn new(
        name: impl Into<String>,
        evaluator: Arc<dyn EvalOracle>,
        predictor: Arc<dyn PolicyOracle>,
        mode: QueryMode,
    ) -> Self {
        Self {
            name: name.into(),
            evaluator,
            predictor,
            mode,
        }
    }

    /// 查询所有需要的分布与评分，写入缓存
    async fn expand<G: GameState>(
        &self,
        children: &[(G::Move, G, String)],
        cache: &mut DecisionCache,
    ) -> Result<FollowUps> {
        // 第一层局面去重（保持枚举顺序）
        let mut seen = HashSet::new();
        let first_level: Vec<(&G, &String)> = children
            .iter()
            .filter(|(_, _, fp)| seen.insert(fp.clone()))
            .map(|(_, child, fp)| (child, fp))
            .collect();

        let keys: Vec<String> = first_level.iter().map(|(_, fp)| (*fp).clone()).collect();
        let predictor = Arc::clone(&self.predictor);
        let distributions = query_batch(self.mode, keys.clone(), move |fen| {
            let predictor = Arc::clone(&predictor);
            async move { predictor.distribution(&fen).await }
        })
        .await?;
        cache.insert_distributions(distributions);

        // 对手回应后的局面
        let mut follow_ups = FollowUps::new();
        let mut eval_keys = keys;
        let mut seen: HashSet<String> = eval_keys.iter().cloned().collect();

        for (child, fp) in &first_level {
            let Some(distribution) = cache.distribution(fp) else {
                continue;
            };

            let mut replies = Vec::with_capacity(distribution.len());
            for entry in distribution.iter() {
                let Some(reply) = child.decode_move(&entry.mv) else {
                    debug!("Dropping undecodable reply {} in {}", entry.mv, fp);
                    continue;
                };
                let next = child.play(&reply).fingerprint();
                if seen.insert(next.clone()) {
                    eval_keys.push(next.clone());
                }
                replies.push((entry.likelihood, next));
            }
            follow_ups.insert((*fp).clone(), replies);
        }

        let evaluator = Arc::clone(&self.evaluator);
        let evaluations = query_batch(self.mode, eval_keys, move |fen| {
            let evaluator = Arc::clone(&evaluator);
            async move { evaluator.analyse(&fen).await.map(|a| a.evaluation) }
        })
        .await?;
        cache.insert_evaluations(evaluations);

        debug!(
            "Decision cache: {} distributions, {} evaluations",
            cache.distribution_count(),
            cache.evaluation_count()
        );

        Ok(follow_ups)
    }

    /// 按枚举顺序比较候选走法
    fn choose<G: GameState>(
        &self,
        side: Side,
        children: Vec<(G::Move, G, String)>,
        follow_ups: &FollowUps,
        cache: &DecisionCache,
    ) -> Option<G::Move> {
        let mut best: Option<(G::Move, f64)> = None;

        for (mv, _, fp) in children {
            if cache.evaluation(&fp).is_some_and(|e| e.favors(side)) {
                info!("{}: {:?} leads to a winning mate", self.name, mv);
                return Some(mv);
            }

            let replies = follow_ups.get(&fp).map(Vec::as_slice).unwrap_or(&[]);
            let score = expected_value(replies, cache);
            debug!("{}: candidate {:?} expected {:.2}", self.name, mv, score);

            let better = match (&best, side) {
                (None, _) => true,
                (Some((_, best_score)), Side::White) => score > *best_score,
                (Some((_, best_score)), Side::Black) => score < *best_score,
            };
            if better {
                best = Some((mv, score));
            }
        }

        best.map(|(mv, score)| {
            info!("{}: chose {:?} (expected {:.2})", self.name, mv, score);
            mv
        })
    }
}

/// 期望评分：Σ 概率 × 回应后局面评分
///
/// 概率按引擎报告值直接使用，不做归一化。
pub fn expected_value(replies: &[(f32, String)], cache: &DecisionCache) -> f64 {
    replies
        .iter()
        .filter_map(|(likelihood, fp)| {
            cache
                .evaluation(fp)
                .map(|e| *likelihood as f64 * e.score as f64)
        })
        .sum()
}

#[async_trait]
impl<G: GameState> MoveSelector<G> for ExpectimaxSelector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn select_move(&self, state: &G) -> Result<Option<G::Move>> {
        let side = state.side_to_move();

        let root = self.evaluator.analyse(&state.fingerprint()).await?;
        if root.evaluation.favors(side) {
            match root.best_move.as_deref().and_then(|m| state.decode_move(m)) {
                Some(mv) => {
                    info!("{}: playing forced mate {:?}", self.name, mv);
                    return Ok(Some(mv));
                }
                None => warn!(
                    "{}: engine reported mate but no usable move ({:?})",
                    self.name, root.best_move
                ),
            }
        }

        let moves = state.legal_moves();
        if moves.is_empty() {
            return Ok(None);
        }

        let children: Vec<(G::Move, G, String)> = moves
            .into_iter()
            .map(|mv| {
                let child = state.play(&mv);
                let fp = child.fingerprint();
                (mv, child, fp)
            })
            .collect();

        let mut cache = DecisionCache::new();
        let follow_ups = self.expand(&children, &mut cache).await?;

        Ok(self.choose(side, children, &follow_ups, &cache))
    }
}
