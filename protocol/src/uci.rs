//! UCI 文本协议
//!
//! 命令格式化与引擎输出解析。引擎输出中夹杂大量诊断信息，
//! 解析函数对无法识别的行一律返回 `None`，由调用方直接丢弃。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::{Evaluation, MoveLikelihood};
use crate::side::Side;

/// 搜索限制
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchLimit {
    /// 固定深度
    Depth(u32),
    /// 固定节点数
    Nodes(u64),
    /// 固定思考时间（毫秒）
    MoveTime(u64),
}

impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLimit::Depth(depth) => write!(f, "depth {depth}"),
            SearchLimit::Nodes(nodes) => write!(f, "nodes {nodes}"),
            SearchLimit::MoveTime(ms) => write!(f, "movetime {ms}"),
        }
    }
}

/// 发送给引擎的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    SetOption { name: String, value: String },
    IsReady,
    Position { fen: String },
    Go(SearchLimit),
    Quit,
}

impl fmt::Display for UciCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciCommand::Uci => write!(f, "uci"),
            UciCommand::SetOption { name, value } => {
                write!(f, "setoption name {name} value {value}")
            }
            UciCommand::IsReady => write!(f, "isready"),
            UciCommand::Position { fen } => write!(f, "position fen {fen}"),
            UciCommand::Go(limit) => write!(f, "go {limit}"),
            UciCommand::Quit => write!(f, "quit"),
        }
    }
}

/// 评分界限类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBound {
    Exact,
    Lower,
    Upper,
}

/// 引擎报告的评分（走子方视角）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    /// 正数表示走子方将杀对方，负数表示走子方被将杀，0 表示走子方已被将死
    Mate(i32),
}

impl Score {
    /// 转换为白方视角的评分
    pub fn to_evaluation(self, side_to_move: Side) -> Evaluation {
        match self {
            Score::Centipawns(cp) => Evaluation::centipawns(cp.saturating_mul(side_to_move.sign())),
            Score::Mate(0) => Evaluation::mated(side_to_move.opponent()),
            Score::Mate(moves) => Evaluation::mate_in(moves.saturating_mul(side_to_move.sign())),
        }
    }
}

/// `info` 行中本程序关心的字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    pub multipv: Option<u32>,
    pub score: Option<(Score, ScoreBound)>,
    /// `info string` 之后的原始文本
    pub string: Option<String>,
}

/// 引擎输出的一行
#[derive(Debug, Clone, PartialEq)]
pub enum EngineLine {
    UciOk,
    ReadyOk,
    /// `bestmove (none)` 或 `bestmove 0000` 解析为 `None`
    BestMove(Option<String>),
    Info(InfoLine),
}

impl EngineLine {
    /// 解析一行输出，无法识别时返回 `None`
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        match tokens.next()? {
            "uciok" => Some(EngineLine::UciOk),
            "readyok" => Some(EngineLine::ReadyOk),
            "bestmove" => {
                let mv = tokens
                    .next()
                    .filter(|m| *m != "(none)" && *m != "0000")
                    .map(str::to_string);
                Some(EngineLine::BestMove(mv))
            }
            "info" => parse_info(tokens).map(EngineLine::Info),
            _ => None,
        }
    }
}

fn parse_info<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<InfoLine> {
    let mut info = InfoLine::default();

    while let Some(token) = tokens.next() {
        match token {
            "depth" => info.depth = Some(tokens.next()?.parse().ok()?),
            "multipv" => info.multipv = Some(tokens.next()?.parse().ok()?),
            "score" => {
                let kind = tokens.next()?;
                let value: i32 = tokens.next()?.parse().ok()?;
                let score = match kind {
                    "cp" => Score::Centipawns(value),
                    "mate" => Score::Mate(value),
                    _ => return None,
                };
                info.score = Some((score, ScoreBound::Exact));
            }
            "lowerbound" => {
                if let Some((_, bound)) = info.score.as_mut() {
                    *bound = ScoreBound::Lower;
                }
            }
            "upperbound" => {
                if let Some((_, bound)) = info.score.as_mut() {
                    *bound = ScoreBound::Upper;
                }
            }
            "string" => {
                info.string = Some(tokens.collect::<Vec<_>>().join(" "));
                break;
            }
            // pv 之后全是走法
            "pv" => break,
            _ => {}
        }
    }

    Some(info)
}

/// 解析走法统计行（`info string` 的内容）
///
/// 格式为 `<move>(...)P:<百分比>%`，解析前去除所有空白。
/// 哨兵 `node` 行与格式错误的行返回 `None`。
pub fn parse_move_stat(payload: &str) -> Option<MoveLikelihood> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let (mv, rest) = compact.split_once('(')?;
    if mv.is_empty() || mv == "node" {
        return None;
    }

    let (_, after) = rest.split_once("P:")?;
    let (pct, _) = after.split_once('%')?;
    let pct: f32 = pct.parse().ok()?;
    if !pct.is_finite() {
        return None;
    }

    Some(MoveLikelihood::new(mv, (pct / 100.0).clamp(0.0, 1.0)))
}
