//! 国际象棋对弈场
//!
//! 包含:
//! - 对局控制
//! - 玩家创建
//! - 配置加载
//! - 棋谱存储

pub mod arena;
pub mod config;
pub mod player;
pub mod storage;

pub use arena::MatchRunner;
pub use config::{ArenaConfig, PlayerConfig, PlayerKind};
pub use player::{build_selector, Oracles};
pub use storage::{pgn_filename, save_pgn};
