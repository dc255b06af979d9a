//! 单个 UCI 引擎进程的会话
//!
//! 生命周期：启动 → 握手 (`uci`/`uciok`, `setoption`, `isready`/`readyok`)
//! → 分析一个局面 → `quit` 并等待进程退出。

use std::process::Stdio;

use protocol::{EngineLine, InfoLine, SearchLimit, UciCommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

use super::EngineConfig;
use crate::error::{OracleError, Result};

/// UCI 引擎会话
pub struct UciSession {
    program: String,
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
}

impl UciSession {
    /// 启动引擎进程并完成握手
    pub async fn launch(config: &EngineConfig) -> Result<Self> {
        let program = config.program();

        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| OracleError::Spawn {
                program: program.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(OracleError::Terminated { program });
        };

        debug!("Launched engine {} (pid {:?})", program, child.id());

        let mut session = Self {
            program,
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
        };

        session.send(&UciCommand::Uci).await?;
        session.wait_for(|line| matches!(line, EngineLine::UciOk)).await?;

        for (name, value) in &config.options {
            session
                .send(&UciCommand::SetOption {
                    name: name.clone(),
                    value: value.clone(),
                })
                .await?;
        }

        session.send(&UciCommand::IsReady).await?;
        session.wait_for(|line| matches!(line, EngineLine::ReadyOk)).await?;

        Ok(session)
    }

    /// 发送一条命令
    pub async fn send(&mut self, command: &UciCommand) -> Result<()> {
        trace!("{} << {}", self.program, command);
        self.stdin.write_all(format!("{command}\n").as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// 读取下一条可识别的输出，噪声行直接丢弃
    pub async fn recv(&mut self) -> Result<EngineLine> {
        loop {
            let Some(raw) = self.lines.next_line().await? else {
                return Err(OracleError::Terminated {
                    program: self.program.clone(),
                });
            };

            match EngineLine::parse(&raw) {
                Some(line) => return Ok(line),
                None => trace!("{} >> (ignored) {}", self.program, raw),
            }
        }
    }

    async fn wait_for(&mut self, done: impl Fn(&EngineLine) -> bool) -> Result<()> {
        loop {
            if done(&self.recv().await?) {
                return Ok(());
            }
        }
    }

    /// 分析局面
    ///
    /// `bestmove` 之前的每个 `info` 行都交给 `on_info`，返回引擎给出的最佳走法。
    pub async fn analyse(
        &mut self,
        fen: &str,
        limit: SearchLimit,
        mut on_info: impl FnMut(InfoLine) + Send,
    ) -> Result<Option<String>> {
        self.send(&UciCommand::Position {
            fen: fen.to_string(),
        })
        .await?;
        self.send(&UciCommand::Go(limit)).await?;

        loop {
            match self.recv().await? {
                EngineLine::Info(info) => on_info(info),
                EngineLine::BestMove(best) => return Ok(best),
                _ => {}
            }
        }
    }

    /// 通知引擎退出并等待进程结束
    pub async fn quit(mut self) -> Result<()> {
        // 引擎可能已经自行退出，此时写入失败可以忽略
        if let Err(e) = self.send(&UciCommand::Quit).await {
            trace!("{} quit command not delivered: {}", self.program, e);
        }
        drop(self.stdin);

        let status = self.child.wait().await?;
        debug!("Engine {} exited with {}", self.program, status);
        Ok(())
    }
}
