//! FEN 格式辅助
//!
//! 国际象棋 FEN 格式：
//! `<棋盘> <走子方> <易位权> <吃过路兵格> <半回合数> <回合数>`
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1`

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};

use crate::error::RulesError;
use crate::side::Side;

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// 读取 FEN 中的走子方字段
pub fn active_side(fen: &str) -> Option<Side> {
    let field = fen.split_whitespace().nth(1)?;
    let mut chars = field.chars();
    let side = Side::from_fen_char(chars.next()?)?;
    match chars.next() {
        None => Some(side),
        Some(_) => None,
    }
}

/// 解析 FEN 为标准国际象棋局面
pub fn chess_from_fen(fen: &str) -> Result<Chess, RulesError> {
    let parsed: Fen = fen.trim().parse().map_err(|e| RulesError::InvalidFen {
        reason: format!("{e}"),
    })?;

    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| RulesError::InvalidFen {
            reason: format!("{e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_side() {
        assert_eq!(active_side(INITIAL_FEN), Some(Side::White));
        assert_eq!(
            active_side("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"),
            Some(Side::Black)
        );
        assert_eq!(active_side("8/8/8/8/8/8/8/8"), None);
        assert_eq!(active_side("8/8/8/8/8/8/8/8 x - - 0 1"), None);
    }

    #[test]
    fn test_chess_from_fen() {
        assert!(chess_from_fen(INITIAL_FEN).is_ok());
        assert!(matches!(
            chess_from_fen("not a fen"),
            Err(RulesError::InvalidFen { .. })
        ));
    }
}
