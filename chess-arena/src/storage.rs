//! 棋谱存储
//!
//! 以 PGN 文本保存棋谱，目标文件已存在时追加随机后缀，不覆盖已有文件。

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use protocol::{GameRecord, COLLISION_SUFFIX_LEN};
use rand::Rng;
use tracing::{debug, info};

/// 保存棋谱，返回实际写入的路径
///
/// 父目录不存在时自动创建；`path` 已被占用时改为 `<name>_<6 位十六进制>.<ext>`，
/// 直到找到空闲的文件名。
pub fn save_pgn(record: &GameRecord, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("无法创建存储目录: {:?}", parent))?;
    }

    let pgn = record.to_pgn();
    let mut candidate = path.to_path_buf();

    loop {
        // 同名文件已存在时 create_new 失败
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut file) => {
                file.write_all(pgn.as_bytes())
                    .with_context(|| format!("写入文件失败: {:?}", candidate))?;
                info!("Saved {} to {}", record.event(), candidate.display());
                return Ok(candidate);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let renamed = with_suffix(path, &random_suffix());
                debug!("{} exists, trying {}", candidate.display(), renamed.display());
                candidate = renamed;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("无法创建文件: {:?}", candidate));
            }
        }
    }
}

/// 根据棋谱生成文件名：`<日期>_<白方>_vs_<黑方>[_r<轮次>].pgn`
pub fn pgn_filename(record: &GameRecord) -> String {
    let meta = &record.metadata;
    let date = meta.date.replace('.', "");
    let round = meta.round.map(|r| format!("_r{}", r)).unwrap_or_default();

    format!(
        "{}_{}_vs_{}{}.pgn",
        date,
        sanitize_filename(&meta.white_player),
        sanitize_filename(&meta.black_player),
        round
    )
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(name)
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..COLLISION_SUFFIX_LEN)
        .map(|_| format!("{:x}", rng.gen_range(0..16u8)))
        .collect()
}

/// 清理文件名中的特殊字符
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}
