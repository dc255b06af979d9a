//! 引擎调用错误
//!
//! 除 [`OracleError::Task`] 外的所有变体都表示外部引擎不可用或中途崩溃，
//! 不做重试，直接中止当前决策。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    /// 引擎进程无法启动
    #[error("Failed to launch engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// 与引擎进程通信失败
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 引擎在完成查询前退出
    #[error("Engine '{program}' exited before finishing the query")]
    Terminated { program: String },

    /// 引擎完成搜索但没有给出评分
    #[error("Engine '{program}' reported no score for {fen}")]
    Incomplete { program: String, fen: String },

    /// 查询的局面不是合法 FEN
    #[error("Cannot query engine with malformed position: {0}")]
    InvalidFen(String),

    /// 并发查询任务异常结束
    #[error("Oracle task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;
