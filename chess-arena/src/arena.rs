//! 对局控制
//!
//! 两个走法选择器轮流走棋，直到终局、五次重复局面、某方无棋可走或达到半回合上限。

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chess_ai::MoveSelector;
use protocol::{GameRecord, GameState, MoveRecord, Outcome, Side, FIVEFOLD_REPETITION};
use tracing::{debug, info};

/// 单局对弈
pub struct MatchRunner<G: GameState> {
    white: Arc<dyn MoveSelector<G>>,
    black: Arc<dyn MoveSelector<G>>,
    site: Option<String>,
    round: Option<u32>,
    /// 半回合上限，`None` 表示不限
    max_plies: Option<u32>,
}

impl<G: GameState> MatchRunner<G> {
    pub fn new(white: Arc<dyn MoveSelector<G>>, black: Arc<dyn MoveSelector<G>>) -> Self {
        Self {
            white,
            black,
            site: None,
            round: None,
            max_plies: None,
        }
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn with_round(mut self, round: Option<u32>) -> Self {
        self.round = round;
        self
    }

    pub fn with_max_plies(mut self, max_plies: Option<u32>) -> Self {
        self.max_plies = max_plies;
        self
    }

    fn selector(&self, side: Side) -> &Arc<dyn MoveSelector<G>> {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    /// 从 `start` 开始下完一局，返回已封存的棋谱
    pub async fn play(&self, start: G) -> Result<GameRecord> {
        let initial_fen = (!start.is_initial()).then(|| start.fingerprint());
        let mut record = GameRecord::new(self.white.name(), self.black.name())
            .with_round(self.round)
            .with_initial_fen(initial_fen);
        if let Some(site) = &self.site {
            record = record.with_site(site.clone());
        }

        info!("Starting {}", record.event());

        let mut state = start;
        let mut progress = MoveLog::default();
        let mut occurrences: HashMap<String, u32> = HashMap::new();
        occurrences.insert(state.repetition_key(), 1);
        let mut repeated = false;

        while !state.is_terminal() {
            if self.max_plies.is_some_and(|max| record.len() >= max as usize) {
                info!("Reached ply limit after {} half-moves", record.len());
                break;
            }

            let side = state.side_to_move();
            let selector = self.selector(side);
            let chosen = selector
                .select_move(&state)
                .await
                .with_context(|| format!("{} failed to choose a move", selector.name()))?;

            let Some(mv) = chosen else {
                info!("{} has no move to play", selector.name());
                break;
            };

            let san = state.notation(&mv);
            let uci = state.encode_move(&mv);
            debug!("{:?} plays {} ({})", side, san, uci);

            record.push_move(MoveRecord::new(uci, san.clone()))?;
            progress.push(side, &san);
            state = state.play(&mv);

            let seen = occurrences.entry(state.repetition_key()).or_default();
            *seen += 1;
            if *seen >= FIVEFOLD_REPETITION {
                info!("Fivefold repetition after {} half-moves", record.len());
                repeated = true;
                break;
            }
        }
        progress.flush();

        let outcome = if state.is_terminal() {
            state.outcome()
        } else if repeated {
            Some(Outcome::Draw)
        } else {
            None
        };
        record.finish(outcome);

        info!(
            "{} finished: {} after {} half-moves",
            record.event(),
            record.result_token(),
            record.len()
        );
        Ok(record)
    }
}

/// 按完整回合输出走法进度（`1. e4 e5`）
#[derive(Default)]
struct MoveLog {
    number: u32,
    pending: Option<String>,
}

impl MoveLog {
    fn push(&mut self, side: Side, san: &str) {
        match side {
            Side::White => {
                self.flush();
                self.number += 1;
                self.pending = Some(format!("{}. {}", self.number, san));
            }
            Side::Black => {
                let line = match self.pending.take() {
                    Some(white) => format!("{} {}", white, san),
                    None => {
                        self.number += 1;
                        format!("{}... {}", self.number, san)
                    }
                };
                info!("{}", line);
            }
        }
    }

    fn flush(&mut self) {
        if let Some(line) = self.pending.take() {
            info!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chess_ai::OracleError;
    use protocol::shakmaty::{Chess, Move};
    use protocol::chess_from_fen;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 按预设 UCI 序列走棋，序列用完后返回 `None`
    struct ScriptedSelector {
        name: String,
        moves: Mutex<VecDeque<String>>,
    }

    impl ScriptedSelector {
        fn new(name: &str, moves: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                moves: Mutex::new(moves.iter().map(|m| m.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl MoveSelector<Chess> for ScriptedSelector {
        fn name(&self) -> &str {
            &self.name
        }

        async fn select_move(&self, state: &Chess) -> chess_ai::Result<Option<Move>> {
            let next = self.moves.lock().unwrap().pop_front();
            Ok(next.and_then(|uci| state.decode_move(&uci)))
        }
    }

    /// 总是走第一个合法走法
    struct FirstLegal;

    #[async_trait]
    impl MoveSelector<Chess> for FirstLegal {
        fn name(&self) -> &str {
            "first"
        }

        async fn select_move(&self, state: &Chess) -> chess_ai::Result<Option<Move>> {
            Ok(GameState::legal_moves(state).into_iter().next())
        }
    }

    struct Broken;

    #[async_trait]
    impl MoveSelector<Chess> for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn select_move(&self, _state: &Chess) -> chess_ai::Result<Option<Move>> {
            Err(OracleError::Terminated {
                program: "stockfish".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_fools_mate() {
        let runner = MatchRunner::new(
            ScriptedSelector::new("white", &["f2f3", "g2g4"]),
            ScriptedSelector::new("black", &["e7e5", "d8h4"]),
        )
        .with_round(Some(3));

        let record = runner.play(Chess::default()).await.unwrap();

        assert!(record.is_finished());
        assert_eq!(record.len(), 4);
        assert_eq!(record.metadata.result, Some(Outcome::BlackWins));
        assert_eq!(record.moves()[3].san, "Qh4#");
        assert_eq!(record.moves()[3].uci, "d8h4");
        assert!(record.initial_fen.is_none());

        let pgn = record.to_pgn();
        assert!(pgn.contains("[Round \"3\"]"));
        assert!(pgn.contains("1. f3 e5 2. g4 Qh4# 0-1"));
    }

    #[tokio::test]
    async fn test_terminal_start_plays_no_moves() {
        let stalemate = chess_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let runner = MatchRunner::new(Arc::new(FirstLegal), Arc::new(FirstLegal));

        let record = runner.play(stalemate).await.unwrap();

        assert!(record.is_empty());
        assert_eq!(record.metadata.result, Some(Outcome::Draw));
        assert!(record.initial_fen.is_some());
    }

    #[tokio::test]
    async fn test_no_move_stops_without_result() {
        let runner = MatchRunner::new(
            ScriptedSelector::new("white", &["e2e4"]),
            ScriptedSelector::new("black", &[]),
        )
        .with_site("test");

        let record = runner.play(Chess::default()).await.unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.metadata.result, None);
        assert_eq!(record.result_token(), "*");
        assert_eq!(record.metadata.site, "test");
    }

    #[tokio::test]
    async fn test_fivefold_repetition_is_draw() {
        let white: Vec<&str> = ["g1f3", "f3g1"].repeat(10);
        let black: Vec<&str> = ["g8f6", "f6g8"].repeat(10);
        let runner = MatchRunner::new(
            ScriptedSelector::new("white", &white),
            ScriptedSelector::new("black", &black),
        )
        .with_max_plies(Some(100));

        let record = runner.play(Chess::default()).await.unwrap();

        // 初始局面在第 4、8、12、16 个半回合后重现
        assert_eq!(record.len(), 16);
        assert_eq!(record.metadata.result, Some(Outcome::Draw));
        assert!(record.to_pgn().ends_with("1/2-1/2\n"));
    }

    #[tokio::test]
    async fn test_ply_limit() {
        let runner = MatchRunner::new(Arc::new(FirstLegal), Arc::new(FirstLegal))
            .with_max_plies(Some(10));

        let record = runner.play(Chess::default()).await.unwrap();

        assert_eq!(record.len(), 10);
        assert_eq!(record.result_token(), "*");
    }

    #[tokio::test]
    async fn test_first_legal_game_terminates() {
        let runner = MatchRunner::new(Arc::new(FirstLegal), Arc::new(FirstLegal));

        let record = runner.play(Chess::default()).await.unwrap();

        assert!(record.is_finished());
        assert!(record.metadata.result.is_some());
    }

    #[tokio::test]
    async fn test_selector_error_propagates() {
        let runner = MatchRunner::new(Arc::new(FirstLegal), Arc::new(Broken));

        let err = runner.play(Chess::default()).await.unwrap_err();

        assert!(err.to_string().contains("broken"));
        assert!(err.downcast_ref::<OracleError>().is_some());
    }
}
