//! 评估引擎（Stockfish 等）

use async_trait::async_trait;
use protocol::{active_side, EngineAnalysis, Evaluation, Score, ScoreBound};
use tracing::debug;

use super::{EngineConfig, UciSession};
use crate::error::{OracleError, Result};
use crate::oracle::EvalOracle;

/// 通过 UCI 进程获取局面评分
pub struct UciEvaluator {
    config: EngineConfig,
}

impl UciEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EvalOracle for UciEvaluator {
    async fn analyse(&self, fen: &str) -> Result<EngineAnalysis> {
        let side = active_side(fen).ok_or_else(|| OracleError::InvalidFen(fen.to_string()))?;

        let mut session = UciSession::launch(&self.config).await?;

        // 只采用主变（multipv 1）上最后一个精确评分
        let mut last_score: Option<Score> = None;
        let best_move = session
            .analyse(fen, self.config.limit, |info| {
                if info.multipv.unwrap_or(1) != 1 {
                    return;
                }
                if let Some((score, ScoreBound::Exact)) = info.score {
                    last_score = Some(score);
                }
            })
            .await?;
        session.quit().await?;

        let evaluation = match (last_score, &best_move) {
            (Some(score), _) => score.to_evaluation(side),
            // 终局且引擎未给出评分
            (None, None) => Evaluation::centipawns(0),
            (None, Some(_)) => {
                return Err(OracleError::Incomplete {
                    program: self.config.program(),
                    fen: fen.to_string(),
                })
            }
        };

        debug!(
            "Evaluated {}: score={} mate={} best={:?}",
            fen, evaluation.score, evaluation.mate, best_move
        );

        Ok(EngineAnalysis {
            evaluation,
            best_move,
        })
    }
}
