//! 引擎进程配置

use std::collections::BTreeMap;
use std::path::PathBuf;

use protocol::SearchLimit;
use serde::{Deserialize, Serialize};

/// 引擎进程配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 可执行文件路径
    pub path: PathBuf,
    /// 命令行参数
    #[serde(default)]
    pub args: Vec<String>,
    /// 握手后通过 `setoption` 设置的选项
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// 每次查询的搜索限制
    #[serde(default = "default_limit")]
    pub limit: SearchLimit,
}

fn default_limit() -> SearchLimit {
    SearchLimit::Depth(10)
}

impl EngineConfig {
    /// 创建只指定路径的配置
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            options: BTreeMap::new(),
            limit: default_limit(),
        }
    }

    /// Stockfish 默认配置：2 线程，32 MB 置换表，深度 10
    pub fn stockfish() -> Self {
        let mut config = Self::new("/usr/local/bin/stockfish");
        config.options.insert("Threads".to_string(), "2".to_string());
        config.options.insert("Hash".to_string(), "32".to_string());
        config
    }

    /// lc0 默认配置：输出每个走法的统计信息，只搜索一个节点
    pub fn lc0() -> Self {
        let mut config = Self::new("/usr/local/bin/lc0").with_limit(SearchLimit::Nodes(1));
        config.args.push("--verbose-move-stats".to_string());
        config
    }

    pub fn with_limit(mut self, limit: SearchLimit) -> Self {
        self.limit = limit;
        self
    }

    /// 用于日志与错误信息的程序名
    pub fn program(&self) -> String {
        self.path.display().to_string()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::stockfish()
    }
}
