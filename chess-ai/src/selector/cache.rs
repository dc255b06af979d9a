//! 单次决策内的查询缓存
//!
//! 每次决策新建一个，显式传入算法，决策结束即丢弃。
//! 每个键只写入一次，写入全部完成之后才会读取，因此不需要加锁。

use std::collections::HashMap;

use protocol::{Distribution, Evaluation};

#[derive(Debug, Default)]
pub struct DecisionCache {
    evaluations: HashMap<String, Evaluation>,
    distributions: HashMap<String, Distribution>,
}

impl DecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入评分，已存在的键保持不变
    pub fn insert_evaluations(&mut self, entries: impl IntoIterator<Item = (String, Evaluation)>) {
        for (fingerprint, evaluation) in entries {
            self.evaluations.entry(fingerprint).or_insert(evaluation);
        }
    }

    /// 写入走法分布，已存在的键保持不变
    pub fn insert_distributions(
        &mut self,
        entries: impl IntoIterator<Item = (String, Distribution)>,
    ) {
        for (fingerprint, distribution) in entries {
            self.distributions.entry(fingerprint).or_insert(distribution);
        }
    }

    pub fn evaluation(&self, fingerprint: &str) -> Option<&Evaluation> {
        self.evaluations.get(fingerprint)
    }

    pub fn distribution(&self, fingerprint: &str) -> Option<&Distribution> {
        self.distributions.get(fingerprint)
    }

    pub fn evaluation_count(&self) -> usize {
        self.evaluations.len()
    }

    pub fn distribution_count(&self) -> usize {
        self.distributions.len()
    }
}
