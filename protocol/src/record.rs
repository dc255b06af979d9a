//! 棋谱记录格式
//!
//! 对局进行中只允许追加走法，结束后封存；输出为标准 PGN 文本。

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SITE, PGN_LINE_WIDTH};
use crate::error::{Result, RulesError};
use crate::state::Outcome;

/// 游戏元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    /// 白方玩家名
    pub white_player: String,
    /// 黑方玩家名
    pub black_player: String,
    /// 游戏日期（PGN 格式 YYYY.MM.DD）
    pub date: String,
    /// 对局地点
    pub site: String,
    /// 轮次
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    /// 游戏结果，未结束时为 `None`
    pub result: Option<Outcome>,
}

/// 走法记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// UCI 编码
    pub uci: String,
    /// 棋谱记法（SAN）
    pub san: String,
}

impl MoveRecord {
    /// 创建新的走法记录
    pub fn new(uci: impl Into<String>, san: impl Into<String>) -> Self {
        Self {
            uci: uci.into(),
            san: san.into(),
        }
    }
}

/// 完整的棋谱记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// 元数据
    pub metadata: GameMetadata,
    /// 非标准初始局面的 FEN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_fen: Option<String>,
    /// 走法列表
    moves: Vec<MoveRecord>,
    /// 是否已封存
    finished: bool,
}

impl GameRecord {
    /// 创建新的棋谱记录（日期为当天）
    pub fn new(white_player: impl Into<String>, black_player: impl Into<String>) -> Self {
        Self {
            metadata: GameMetadata {
                white_player: white_player.into(),
                black_player: black_player.into(),
                date: Local::now().format("%Y.%m.%d").to_string(),
                site: DEFAULT_SITE.to_string(),
                round: None,
                result: None,
            },
            initial_fen: None,
            moves: Vec::new(),
            finished: false,
        }
    }

    /// 设置对局地点
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.metadata.site = site.into();
        self
    }

    /// 设置轮次
    pub fn with_round(mut self, round: Option<u32>) -> Self {
        self.metadata.round = round;
        self
    }

    /// 从自定义局面开始
    pub fn with_initial_fen(mut self, fen: Option<String>) -> Self {
        self.initial_fen = fen;
        self
    }

    /// 追加走法
    pub fn push_move(&mut self, mv: MoveRecord) -> Result<()> {
        if self.finished {
            return Err(RulesError::RecordSealed);
        }
        self.moves.push(mv);
        Ok(())
    }

    /// 结束对局并封存棋谱
    pub fn finish(&mut self, result: Option<Outcome>) {
        self.metadata.result = result;
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// 已走的半回合数
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// 对局名称
    pub fn event(&self) -> String {
        format!(
            "{} vs. {}",
            self.metadata.white_player, self.metadata.black_player
        )
    }

    /// PGN 结果标记
    pub fn result_token(&self) -> &'static str {
        self.metadata
            .result
            .as_ref()
            .map(Outcome::pgn_token)
            .unwrap_or("*")
    }

    /// 生成 PGN 文本
    pub fn to_pgn(&self) -> String {
        let mut output = String::new();

        let round = self
            .metadata
            .round
            .map(|r| r.to_string())
            .unwrap_or_else(|| "?".to_string());

        push_tag(&mut output, "Event", &self.event());
        push_tag(&mut output, "Site", &self.metadata.site);
        push_tag(&mut output, "Date", &self.metadata.date);
        push_tag(&mut output, "Round", &round);
        push_tag(&mut output, "White", &self.metadata.white_player);
        push_tag(&mut output, "Black", &self.metadata.black_player);
        push_tag(&mut output, "Result", self.result_token());
        if let Some(fen) = &self.initial_fen {
            push_tag(&mut output, "SetUp", "1");
            push_tag(&mut output, "FEN", fen);
        }
        output.push('\n');

        // 自定义局面可能由黑方先走
        let black_first = self
            .initial_fen
            .as_deref()
            .and_then(crate::fen::active_side)
            == Some(crate::side::Side::Black);
        let first_number = self
            .initial_fen
            .as_deref()
            .and_then(|fen| fen.split_whitespace().nth(5))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(1);

        let mut tokens = Vec::with_capacity(self.moves.len() * 2 + 1);
        for (i, mv) in self.moves.iter().enumerate() {
            let ply = if black_first { i + 1 } else { i };
            let number = first_number + ply / 2;
            if ply % 2 == 0 {
                tokens.push(format!("{}.", number));
            } else if i == 0 {
                tokens.push(format!("{}...", number));
            }
            tokens.push(mv.san.clone());
        }
        tokens.push(self.result_token().to_string());

        let mut line_len = 0;
        for token in tokens {
            if line_len > 0 && line_len + 1 + token.len() > PGN_LINE_WIDTH {
                output.push('\n');
                line_len = 0;
            } else if line_len > 0 {
                output.push(' ');
                line_len += 1;
            }
            line_len += token.len();
            output.push_str(&token);
        }
        output.push('\n');

        output
    }
}

fn push_tag(output: &mut String, name: &str, value: &str) {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    output.push_str(&format!("[{} \"{}\"]\n", name, escaped));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pgn_headers() {
        let mut record = GameRecord::new("antimaia", "maia").with_round(Some(3));
        record.finish(None);

        let pgn = record.to_pgn();
        assert!(pgn.contains("[Event \"antimaia vs. maia\"]"));
        assert!(pgn.contains("[Site \"lukesalamone.com\"]"));
        assert!(pgn.contains("[Round \"3\"]"));
        assert!(pgn.contains("[White \"antimaia\"]"));
        assert!(pgn.contains("[Black \"maia\"]"));
        assert!(pgn.contains("[Result \"*\"]"));
        assert!(!pgn.contains("[FEN"));
        assert!(pgn.trim_end().ends_with('*'));
    }

    #[test]
    fn test_pgn_movetext() {
        let mut record = GameRecord::new("w", "b");
        for (uci, san) in [("f2f3", "f3"), ("e7e5", "e5"), ("g2g4", "g4"), ("d8h4", "Qh4#")] {
            record.push_move(MoveRecord::new(uci, san)).unwrap();
        }
        record.finish(Some(Outcome::BlackWins));

        let pgn = record.to_pgn();
        assert!(pgn.contains("1. f3 e5 2. g4 Qh4# 0-1"));
        assert!(pgn.contains("[Result \"0-1\"]"));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_black_to_move_start() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        let mut record = GameRecord::new("w", "b").with_initial_fen(Some(fen.to_string()));
        record.push_move(MoveRecord::new("e7e5", "e5")).unwrap();
        record.push_move(MoveRecord::new("g1f3", "Nf3")).unwrap();
        record.finish(None);

        let pgn = record.to_pgn();
        assert!(pgn.contains("[SetUp \"1\"]"));
        assert!(pgn.contains("1... e5 2. Nf3 *"));
    }

    #[test]
    fn test_sealed_record_rejects_moves() {
        let mut record = GameRecord::new("w", "b");
        record.finish(Some(Outcome::Draw));
        assert!(record.is_finished());
        assert_eq!(
            record.push_move(MoveRecord::new("e2e4", "e4")),
            Err(RulesError::RecordSealed)
        );
        assert!(record.is_empty());
    }

    #[test]
    fn test_line_wrapping() {
        let mut record = GameRecord::new("w", "b");
        for _ in 0..60 {
            record.push_move(MoveRecord::new("g1f3", "Nf3")).unwrap();
        }
        record.finish(None);

        let pgn = record.to_pgn();
        for line in pgn.lines() {
            assert!(line.len() <= PGN_LINE_WIDTH, "line too long: {}", line);
        }
    }

    #[test]
    fn test_date_format() {
        let record = GameRecord::new("w", "b");
        let parts: Vec<_> = record.metadata.date.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 4);
    }
}
