//! 引擎分析结果类型
//!
//! - [`Evaluation`]：局面评分（白方视角）
//! - [`Distribution`]：走法概率分布（未归一化）
//! - [`EngineAnalysis`]：评估引擎的一次完整分析

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{MATE_SCORE, MAX_CENTIPAWNS};
use crate::side::Side;

/// 局面评分
///
/// 符号约定固定：正分有利于白方，与走子方无关。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evaluation {
    /// 评分（厘兵，将杀时为放大后的将杀分）
    pub score: i32,
    /// 是否为将杀评分
    pub mate: bool,
}

impl Evaluation {
    /// 厘兵评分（白方视角）
    pub fn centipawns(cp: i32) -> Self {
        Self {
            score: cp.clamp(-MAX_CENTIPAWNS, MAX_CENTIPAWNS),
            mate: false,
        }
    }

    /// 将杀评分（白方视角）
    ///
    /// `moves` 为正表示白方在 `moves` 步内将杀，为负表示黑方将杀。
    /// 步数越少分值越大。
    pub fn mate_in(moves: i32) -> Self {
        let distance = moves.unsigned_abs().min((MATE_SCORE - MAX_CENTIPAWNS - 1) as u32) as i32;
        let magnitude = MATE_SCORE - distance;
        Self {
            score: if moves < 0 { -magnitude } else { magnitude },
            mate: true,
        }
    }

    /// 将杀已经发生：`winner` 一方获胜
    pub fn mated(winner: Side) -> Self {
        Self {
            score: winner.sign() * MATE_SCORE,
            mate: true,
        }
    }

    /// 是否为有利于 `side` 的将杀
    pub fn favors(&self, side: Side) -> bool {
        self.mate && self.score.signum() == side.sign()
    }
}

/// 单个走法及其概率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveLikelihood {
    /// 走法的规范编码（UCI）
    pub mv: String,
    /// 概率，取值 [0, 1]
    pub likelihood: f32,
}

impl MoveLikelihood {
    pub fn new(mv: impl Into<String>, likelihood: f32) -> Self {
        Self {
            mv: mv.into(),
            likelihood,
        }
    }
}

/// 走法概率分布
///
/// 按概率降序排列，同一局面内走法唯一；概率之和不保证为 1。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    entries: Vec<MoveLikelihood>,
}

impl Distribution {
    /// 从任意顺序的条目构造（稳定排序，重复走法保留首次出现）
    pub fn from_unsorted(entries: impl IntoIterator<Item = MoveLikelihood>) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<MoveLikelihood> = entries
            .into_iter()
            .filter(|e| seen.insert(e.mv.clone()))
            .map(|e| MoveLikelihood {
                likelihood: e.likelihood.clamp(0.0, 1.0),
                ..e
            })
            .collect();

        entries.sort_by(|a, b| b.likelihood.total_cmp(&a.likelihood));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveLikelihood> {
        self.entries.iter()
    }

    /// 概率最高的走法
    pub fn top(&self) -> Option<&MoveLikelihood> {
        self.entries.first()
    }

    /// 实际报告的概率总量
    pub fn total_mass(&self) -> f64 {
        self.entries.iter().map(|e| e.likelihood as f64).sum()
    }

    /// 归一化后的概率（总量为 0 时返回 `None`）
    pub fn normalized(&self) -> Option<Vec<f64>> {
        let total = self.total_mass();
        if total <= 0.0 {
            return None;
        }
        Some(
            self.entries
                .iter()
                .map(|e| e.likelihood as f64 / total)
                .collect(),
        )
    }
}

/// 评估引擎对单个局面的分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineAnalysis {
    pub evaluation: Evaluation,
    /// 引擎推荐的走法（UCI），终局时为 `None`
    pub best_move: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_dominates_centipawns() {
        let best_cp = Evaluation::centipawns(i32::MAX);
        let slow_mate = Evaluation::mate_in(60);
        assert!(slow_mate.score > best_cp.score);
        assert!(Evaluation::mate_in(-60).score < Evaluation::centipawns(i32::MIN).score);
    }

    #[test]
    fn test_shorter_mate_scores_higher() {
        assert!(Evaluation::mate_in(1).score > Evaluation::mate_in(3).score);
        assert!(Evaluation::mate_in(-1).score < Evaluation::mate_in(-3).score);
    }

    #[test]
    fn test_favors() {
        let white_mates = Evaluation::mate_in(2);
        assert!(white_mates.favors(Side::White));
        assert!(!white_mates.favors(Side::Black));

        let black_mates = Evaluation::mate_in(-2);
        assert!(black_mates.favors(Side::Black));

        assert!(Evaluation::mated(Side::Black).favors(Side::Black));
        assert!(!Evaluation::centipawns(900).favors(Side::White));
    }

    #[test]
    fn test_distribution_sorted_and_unique() {
        let dist = Distribution::from_unsorted([
            MoveLikelihood::new("e2e4", 0.2),
            MoveLikelihood::new("d2d4", 0.5),
            MoveLikelihood::new("e2e4", 0.9),
            MoveLikelihood::new("g1f3", 0.1),
        ]);

        let moves: Vec<_> = dist.iter().map(|e| e.mv.as_str()).collect();
        assert_eq!(moves, vec!["d2d4", "e2e4", "g1f3"]);
        assert_eq!(dist.top().map(|e| e.likelihood), Some(0.5));
        assert!((dist.total_mass() - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalized() {
        let dist = Distribution::from_unsorted([
            MoveLikelihood::new("a", 0.3),
            MoveLikelihood::new("b", 0.1),
        ]);
        let probs = dist.normalized().unwrap();
        assert!((probs[0] - 0.75).abs() < 1e-6);
        assert!((probs[1] - 0.25).abs() < 1e-6);

        assert!(Distribution::default().normalized().is_none());
        let zero = Distribution::from_unsorted([MoveLikelihood::new("a", 0.0)]);
        assert!(zero.normalized().is_none());
    }
}
