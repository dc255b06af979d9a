//! 测试辅助：脚本化的局面图与引擎

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use protocol::{Distribution, EngineAnalysis, Evaluation, GameState, MoveLikelihood, Outcome, Side};

use crate::error::{OracleError, Result};
use crate::oracle::{EvalOracle, PolicyOracle};

#[derive(Debug, Default)]
struct Node {
    side: Option<Side>,
    edges: Vec<(String, String)>,
}

/// 由命名节点构成的有向图局面，指纹即节点名
#[derive(Clone, Debug)]
pub struct ScriptedGame {
    graph: Arc<HashMap<String, Node>>,
    node: String,
}

#[derive(Default)]
pub struct GraphBuilder {
    nodes: HashMap<String, Node>,
}

impl GraphBuilder {
    /// 添加节点：`edges` 为 (走法名, 目标节点)
    pub fn node(mut self, name: &str, side: Side, edges: &[(&str, &str)]) -> Self {
        let node = self.nodes.entry(name.to_string()).or_default();
        node.side = Some(side);
        node.edges = edges
            .iter()
            .map(|(mv, target)| (mv.to_string(), target.to_string()))
            .collect();
        self
    }

    pub fn start(self, name: &str) -> ScriptedGame {
        ScriptedGame {
            graph: Arc::new(self.nodes),
            node: name.to_string(),
        }
    }
}

impl ScriptedGame {
    fn edges(&self) -> &[(String, String)] {
        self.graph
            .get(&self.node)
            .map(|n| n.edges.as_slice())
            .unwrap_or(&[])
    }
}

impl GameState for ScriptedGame {
    type Move = String;

    fn side_to_move(&self) -> Side {
        self.graph
            .get(&self.node)
            .and_then(|n| n.side)
            .unwrap_or(Side::White)
    }

    fn legal_moves(&self) -> Vec<String> {
        self.edges().iter().map(|(mv, _)| mv.clone()).collect()
    }

    fn play(&self, mv: &String) -> Self {
        let target = self
            .edges()
            .iter()
            .find(|(name, _)| name == mv)
            .map(|(_, target)| target.clone())
            .expect("scripted move must exist");
        Self {
            graph: Arc::clone(&self.graph),
            node: target,
        }
    }

    fn is_terminal(&self) -> bool {
        self.edges().is_empty()
    }

    fn outcome(&self) -> Option<Outcome> {
        self.is_terminal().then_some(Outcome::Draw)
    }

    fn fingerprint(&self) -> String {
        self.node.clone()
    }

    fn encode_move(&self, mv: &String) -> String {
        mv.clone()
    }

    fn decode_move(&self, encoded: &str) -> Option<String> {
        self.edges()
            .iter()
            .find(|(name, _)| name == encoded)
            .map(|(name, _)| name.clone())
    }
}

/// 按指纹返回预设评分的评估引擎（未设置的局面评分为 0）
#[derive(Default)]
pub struct ScriptedEvaluator {
    evaluations: HashMap<String, Evaluation>,
    best_moves: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEvaluator {
    pub fn with_eval(mut self, fingerprint: &str, evaluation: Evaluation) -> Self {
        self.evaluations.insert(fingerprint.to_string(), evaluation);
        self
    }

    pub fn with_cp(self, fingerprint: &str, cp: i32) -> Self {
        self.with_eval(fingerprint, Evaluation::centipawns(cp))
    }

    pub fn with_best(mut self, fingerprint: &str, mv: &str) -> Self {
        self.best_moves.insert(fingerprint.to_string(), mv.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, fingerprint: &str) -> usize {
        self.calls().iter().filter(|c| *c == fingerprint).count()
    }
}

#[async_trait]
impl EvalOracle for ScriptedEvaluator {
    async fn analyse(&self, fen: &str) -> Result<EngineAnalysis> {
        self.calls.lock().unwrap().push(fen.to_string());
        tokio::task::yield_now().await;
        Ok(EngineAnalysis {
            evaluation: self
                .evaluations
                .get(fen)
                .copied()
                .unwrap_or(Evaluation::centipawns(0)),
            best_move: self.best_moves.get(fen).cloned(),
        })
    }
}

/// 按指纹返回预设分布的走法分布引擎（未设置的局面为空分布）
#[derive(Default)]
pub struct ScriptedPredictor {
    distributions: HashMap<String, Distribution>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedPredictor {
    pub fn with_distribution(mut self, fingerprint: &str, entries: &[(&str, f32)]) -> Self {
        let dist = Distribution::from_unsorted(
            entries.iter().map(|(mv, p)| MoveLikelihood::new(*mv, *p)),
        );
        self.distributions.insert(fingerprint.to_string(), dist);
        self
    }

    pub fn failing_on(mut self, fingerprint: &str) -> Self {
        self.failing.insert(fingerprint.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, fingerprint: &str) -> usize {
        self.calls().iter().filter(|c| *c == fingerprint).count()
    }
}

#[async_trait]
impl PolicyOracle for ScriptedPredictor {
    async fn distribution(&self, fen: &str) -> Result<Distribution> {
        self.calls.lock().unwrap().push(fen.to_string());
        tokio::task::yield_now().await;
        if self.failing.contains(fen) {
            return Err(OracleError::Terminated {
                program: "scripted".to_string(),
            });
        }
        Ok(self.distributions.get(fen).cloned().unwrap_or_default())
    }
}
