//! 国际象棋规则适配
//!
//! 基于 `shakmaty` 实现 [`GameState`]，走法编码使用 UCI，棋谱记法使用 SAN。

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position};

use crate::constants::AUTO_DRAW_HALFMOVES;
use crate::fen::INITIAL_FEN;
use crate::side::Side;
use crate::state::{GameState, Outcome};

impl GameState for Chess {
    type Move = Move;

    fn side_to_move(&self) -> Side {
        self.turn().into()
    }

    fn legal_moves(&self) -> Vec<Move> {
        Position::legal_moves(self).into_iter().collect()
    }

    fn play(&self, mv: &Move) -> Self {
        let mut next = self.clone();
        next.play_unchecked(*mv);
        next
    }

    fn is_terminal(&self) -> bool {
        self.is_game_over() || self.halfmoves() >= AUTO_DRAW_HALFMOVES
    }

    fn outcome(&self) -> Option<Outcome> {
        if self.is_checkmate() {
            // 被将死的是走子方
            let loser = Side::from(self.turn());
            Some(Outcome::win_for(loser.opponent()))
        } else if GameState::is_terminal(self) {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    fn fingerprint(&self) -> String {
        Fen::from_position(self, EnPassantMode::Legal).to_string()
    }

    fn encode_move(&self, mv: &Move) -> String {
        mv.to_uci(CastlingMode::Standard).to_string()
    }

    fn decode_move(&self, encoded: &str) -> Option<Move> {
        let uci: UciMove = encoded.trim().parse().ok()?;
        uci.to_move(self).ok()
    }

    fn notation(&self, mv: &Move) -> String {
        SanPlus::from_move(self.clone(), *mv).to_string()
    }

    fn is_initial(&self) -> bool {
        self.fingerprint() == INITIAL_FEN
    }

    /// FEN 去掉半回合计数和回合数
    fn repetition_key(&self) -> String {
        let fen = self.fingerprint();
        fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }
}
