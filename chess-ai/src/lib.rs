//! 国际象棋走法选择
//!
//! 包含:
//! - UCI 引擎客户端（评估引擎、人类走法分布引擎）
//! - 顺序 / 并发批量查询
//! - 期望加权选择器、分布抽样选择器、引擎选择器

mod batch;
pub mod engine;
mod error;
mod oracle;
mod selector;

#[cfg(test)]
mod test_support;

pub use batch::{query_batch, QueryMode};
pub use engine::{EngineConfig, UciEvaluator, UciPredictor, UciSession};
pub use error::{OracleError, Result};
pub use oracle::{EvalOracle, PolicyOracle};
pub use selector::{
    expected_value, DecisionCache, EngineSelector, ExpectimaxSelector, MoveSelector,
    SamplingSelector,
};
