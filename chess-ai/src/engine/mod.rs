//! UCI 引擎客户端
//!
//! 每次查询启动一个独立的引擎进程，完成后退出。
//! 支持 Stockfish 这类评估引擎和 lc0 (`--verbose-move-stats`) 这类走法分布引擎。

mod config;
mod evaluator;
mod predictor;
mod session;

pub use config::EngineConfig;
pub use evaluator::UciEvaluator;
pub use predictor::UciPredictor;
pub use session::UciSession;
