//! 协议常量定义

/// 将杀评分基数
///
/// 任何将杀评分的绝对值为 `MATE_SCORE - 将杀步数`，必然大于所有厘兵评分。
pub const MATE_SCORE: i32 = 100_000;

/// 厘兵评分的上限（超出部分会被截断）
pub const MAX_CENTIPAWNS: i32 = 90_000;

/// 自动和棋的半回合数（75 回合规则）
pub const AUTO_DRAW_HALFMOVES: u32 = 150;

/// 棋谱默认的 Site 标签
pub const DEFAULT_SITE: &str = "lukesalamone.com";

/// 同一局面出现的次数达到此值时自动和棋
pub const FIVEFOLD_REPETITION: u32 = 5;

/// PGN 着法文本的行宽
pub const PGN_LINE_WIDTH: usize = 80;

/// 文件名冲突时追加的十六进制后缀长度
pub const COLLISION_SUFFIX_LEN: usize = 6;
