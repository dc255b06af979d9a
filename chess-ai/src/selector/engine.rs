//! 直接采用评估引擎的最佳走法

use std::sync::Arc;

use async_trait::async_trait;
use protocol::GameState;
use tracing::{info, warn};

use super::MoveSelector;
use crate::error::Result;
use crate::oracle::EvalOracle;

pub struct EngineSelector {
    name: String,
    evaluator: Arc<dyn EvalOracle>,
}

impl EngineSelector {
    pub fn new(name: impl Into<String>, evaluator: Arc<dyn EvalOracle>) -> Self {
        Self {
            name: name.into(),
            evaluator,
        }
    }
}

#[async_trait]
impl<G: GameState> MoveSelector<G> for EngineSelector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn select_move(&self, state: &G) -> Result<Option<G::Move>> {
        if state.legal_moves().is_empty() {
            return Ok(None);
        }

        let analysis = self.evaluator.analyse(&state.fingerprint()).await?;
        let Some(best) = analysis.best_move else {
            return Ok(None);
        };

        match state.decode_move(&best) {
            Some(mv) => {
                info!("{}: {} ({:?})", self.name, best, analysis.evaluation);
                Ok(Some(mv))
            }
            None => {
                warn!("{}: engine suggested unusable move {}", self.name, best);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GraphBuilder, ScriptedEvaluator, ScriptedGame};
    use protocol::Side;

    fn game() -> ScriptedGame {
        GraphBuilder::default()
            .node("root", Side::Black, &[("a", "A"), ("b", "B")])
            .start("root")
    }

    #[tokio::test]
    async fn test_plays_engine_best_move() {
        let evaluator = Arc::new(ScriptedEvaluator::default().with_best("root", "b"));
        let selector = EngineSelector::new("stockfish", evaluator.clone());

        let mv: Option<String> = selector.select_move(&game()).await.unwrap();
        assert_eq!(mv.as_deref(), Some("b"));
        assert_eq!(evaluator.calls(), vec!["root".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_or_unusable_best_move() {
        let selector = EngineSelector::new("stockfish", Arc::new(ScriptedEvaluator::default()));
        let mv: Option<String> = selector.select_move(&game()).await.unwrap();
        assert!(mv.is_none());

        let selector = EngineSelector::new(
            "stockfish",
            Arc::new(ScriptedEvaluator::default().with_best("root", "zz")),
        );
        let mv: Option<String> = selector.select_move(&game()).await.unwrap();
        assert!(mv.is_none());
    }

    #[tokio::test]
    async fn test_terminal_position_skips_engine() {
        let evaluator = Arc::new(ScriptedEvaluator::default());
        let selector = EngineSelector::new("stockfish", evaluator.clone());
        let terminal = GraphBuilder::default()
            .node("end", Side::White, &[])
            .start("end");

        let mv: Option<String> = selector.select_move(&terminal).await.unwrap();
        assert!(mv.is_none());
        assert!(evaluator.calls().is_empty());
    }
}
