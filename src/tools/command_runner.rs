use anyhow::{Context, Result, bail};
use log::debug;
use std::ffi::OsString;
use std::process::Command;

/// 執行外部指令（ssh、rsync）
pub trait CommandRunner: Sync {
    /// 指令失敗（無法啟動或非零結束碼）時回傳錯誤
    fn run(&self, program: &str, args: &[OsString]) -> Result<()>;
}

/// 實際呼叫系統指令
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<()> {
        let mut command = Command::new(program);
        command.args(args);
        debug!("Executing: {command:?}");

        let output = command
            .output()
            .with_context(|| format!("failed to execute {program}"))?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            bail!("{program} exited with {}, output: {}", output.status, combined.trim());
        }
        Ok(())
    }
}
