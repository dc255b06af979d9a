//! 对弈共享协议库
//!
//! 包含:
//! - 阵营、局面接口（规则引擎抽象）及其国际象棋实现
//! - 评分与走法概率分布
//! - UCI 文本协议的命令与输出解析
//! - 棋谱格式 (PGN)

mod analysis;
mod chess;
mod constants;
mod error;
mod fen;
mod record;
mod side;
mod state;
mod uci;

pub use analysis::{Distribution, EngineAnalysis, Evaluation, MoveLikelihood};
pub use constants::*;
pub use error::{Result, RulesError};
pub use fen::{active_side, chess_from_fen, INITIAL_FEN};
pub use record::{GameMetadata, GameRecord, MoveRecord};
pub use side::Side;
pub use state::{GameState, Outcome};
pub use uci::{parse_move_stat, EngineLine, InfoLine, Score, ScoreBound, SearchLimit, UciCommand};

/// 重导出 `shakmaty`，便于构造局面
pub use shakmaty;
