//! 规则引擎接口
//!
//! 选择器和对局控制只通过 [`GameState`] 访问局面，不依赖具体棋类实现。

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::side::Side;

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
}

impl Outcome {
    /// 某方获胜
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::White => Outcome::WhiteWins,
            Side::Black => Outcome::BlackWins,
        }
    }

    /// PGN 结果标记
    pub fn pgn_token(&self) -> &'static str {
        match self {
            Outcome::WhiteWins => "1-0",
            Outcome::BlackWins => "0-1",
            Outcome::Draw => "1/2-1/2",
        }
    }
}

/// 不可变局面
///
/// 新局面只能通过 [`GameState::play`] 从已有局面派生。
pub trait GameState: Clone + Send + Sync + 'static {
    type Move: Clone + Debug + Send + Sync + 'static;

    /// 当前走子方
    fn side_to_move(&self) -> Side;

    /// 所有合法走法（按规则引擎定义的顺序）
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// 走一步，返回新局面（走法必须合法）
    fn play(&self, mv: &Self::Move) -> Self;

    /// 是否为终局
    fn is_terminal(&self) -> bool;

    /// 终局结果，未结束时为 `None`
    fn outcome(&self) -> Option<Outcome>;

    /// 局面指纹（规范化字符串，用于缓存与去重）
    fn fingerprint(&self) -> String;

    /// 走法编码为规范短字符串
    fn encode_move(&self, mv: &Self::Move) -> String;

    /// 从规范短字符串解码走法，非法或无法解析时返回 `None`
    fn decode_move(&self, encoded: &str) -> Option<Self::Move>;

    /// 棋谱记法，默认与规范编码相同
    fn notation(&self, mv: &Self::Move) -> String {
        self.encode_move(mv)
    }

    /// 是否为标准初始局面
    fn is_initial(&self) -> bool {
        false
    }

    /// 判断重复局面用的键，默认与指纹相同
    fn repetition_key(&self) -> String {
        self.fingerprint()
    }
}
