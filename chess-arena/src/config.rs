//! 对局配置
//!
//! JSON 格式，所有字段都有默认值。加载顺序：
//! 1. 命令行指定的路径（无法读取或格式错误时报错）
//! 2. `<配置目录>/chess-arena/arena.json`（格式错误时警告并使用默认值）
//! 3. 默认配置

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chess_ai::{EngineConfig, QueryMode};
use protocol::shakmaty::Chess;
use protocol::{chess_from_fen, DEFAULT_SITE};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 选择器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// 直接采用评估引擎的最佳走法
    Engine,
    /// 期望加权选择
    Expectimax,
    /// 按人类走法分布抽样
    Sampling,
}

/// 单方玩家配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub kind: PlayerKind,
    /// 批量查询模式（仅 expectimax）
    pub mode: QueryMode,
    /// 随机种子（仅 sampling），不设置时每次运行不同
    pub seed: Option<u64>,
    /// 总是选概率最高的走法（仅 sampling）
    pub greedy: bool,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mode: QueryMode::default(),
            seed: None,
            greedy: false,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new("antimaia", PlayerKind::Expectimax)
    }
}

/// 对局配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// 评估引擎
    pub evaluator: EngineConfig,
    /// 人类走法分布引擎
    pub predictor: EngineConfig,
    pub white: PlayerConfig,
    pub black: PlayerConfig,
    /// 对局数
    pub games: u32,
    /// 棋谱保存目录
    pub output_dir: PathBuf,
    pub site: String,
    /// 起始局面，默认标准开局
    pub start_fen: Option<String>,
    /// 每局半回合上限
    pub max_plies: Option<u32>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            evaluator: EngineConfig::stockfish(),
            predictor: EngineConfig::lc0(),
            white: PlayerConfig::default(),
            black: PlayerConfig::new("maia", PlayerKind::Sampling),
            games: 1,
            output_dir: PathBuf::from("games"),
            site: DEFAULT_SITE.to_string(),
            start_fen: None,
            max_plies: None,
        }
    }
}

impl ArenaConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("chess-arena");
            path.push("arena.json");
            path
        })
    }

    /// 按加载顺序读取配置
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        let Some(path) = Self::default_path() else {
            warn!("No config directory available, using defaults");
            return Ok(Self::default());
        };
        Ok(Self::load_or_default(&path))
    }

    /// 读取指定文件
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("配置文件格式无效: {:?}", path))
    }

    /// 读取可选的配置文件，不存在或无效时使用默认值
    fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// 起始局面
    pub fn start_position(&self) -> Result<Chess> {
        match &self.start_fen {
            Some(fen) => chess_from_fen(fen).with_context(|| format!("起始局面无效: {}", fen)),
            None => Ok(Chess::default()),
        }
    }
}
