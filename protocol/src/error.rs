//! 错误类型定义

use thiserror::Error;

/// 规则层错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 棋谱已结束，不能再追加走法
    #[error("Game record is already finished")]
    RecordSealed,
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RulesError>;
