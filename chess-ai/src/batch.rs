//! 批量查询调度
//!
//! - 顺序模式：逐个等待，每个查询完整结束后才开始下一个
//! - 并发模式：每个查询作为独立任务派发到当前运行时，全部结束后再汇总

use std::collections::{HashMap, HashSet};
use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::{OracleError, Result};

/// 查询模式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    #[default]
    Sequential,
    Concurrent,
}

/// 对一批局面指纹执行查询，返回 指纹 → 结果
///
/// 调用方应在派发前完成去重；这里对重复键只查询一次。
/// 并发模式下即使有任务失败也会等待其余任务全部结束，然后返回第一个错误。
pub async fn query_batch<T, F, Fut>(
    mode: QueryMode,
    keys: Vec<String>,
    query: F,
) -> Result<HashMap<String, T>>
where
    T: Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let mut seen = HashSet::with_capacity(keys.len());
    let keys: Vec<String> = keys.into_iter().filter(|k| seen.insert(k.clone())).collect();
    let mut results = HashMap::with_capacity(keys.len());

    debug!("Dispatching {} queries ({:?})", keys.len(), mode);

    match mode {
        QueryMode::Sequential => {
            for key in keys {
                let value = query(key.clone()).await?;
                results.insert(key, value);
            }
        }
        QueryMode::Concurrent => {
            let mut tasks = JoinSet::new();
            for key in keys {
                let pending = query(key.clone());
                tasks.spawn(async move { (key, pending.await) });
            }

            let mut first_error = None;
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((key, Ok(value))) => {
                        results.insert(key, value);
                    }
                    Ok((key, Err(e))) => {
                        warn!("Query for {} failed: {}", key, e);
                        first_error.get_or_insert(e);
                    }
                    Err(e) => {
                        warn!("Query task aborted: {}", e);
                        first_error.get_or_insert(OracleError::Task(e.to_string()));
                    }
                }
            }

            if let Some(e) = first_error {
                return Err(e);
            }
        }
    }

    Ok(results)
}
