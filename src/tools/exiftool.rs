//! exiftool 中繼資料後端
//!
//! 以 `-stay_open` 模式維持單一 exiftool 程序，所有檔案共用同一個 session

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Mutex, PoisonError};

/// 單一檔案的標籤與值
pub type MetadataFields = Map<String, Value>;

const READY_MARKER: &str = "{ready}";

/// 依檔案路徑取得中繼資料的後端
pub trait MetadataBackend: Send {
    /// 回傳 `None` 代表後端沒有任何中繼資料
    fn read_fields(&mut self, path: &Path) -> Result<Option<MetadataFields>>;
}

pub struct ExifToolSession {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl ExifToolSession {
    /// 啟動系統上的 exiftool
    pub fn start() -> Result<Self> {
        Self::spawn(Command::new("exiftool"))
    }

    /// 以指定的指令啟動 session，會自動加上 `-stay_open True -@ -`
    pub fn spawn(mut command: Command) -> Result<Self> {
        let mut child = command
            .args(["-stay_open", "True", "-@", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to initialize exiftool")?;

        let stdin = child.stdin.take().context("exiftool stdin unavailable")?;
        let stdout = child.stdout.take().context("exiftool stdout unavailable")?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
        })
    }

    fn execute(&mut self, path: &str) -> Result<String> {
        let result = self.request(path);
        if result.is_err() {
            self.abandon();
        }
        result
    }

    /// 送出單一請求並讀到 `{ready}` 為止
    ///
    /// 輸出以位元組讀取，非 UTF-8 的標籤值會被替換而不是中斷回應
    fn request(&mut self, path: &str) -> Result<String> {
        let stdin = self
            .stdin
            .as_mut()
            .context("exiftool session already closed")?;
        write!(stdin, "-json\n{path}\n-execute\n")?;
        stdin.flush()?;

        let mut output = String::new();
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = self
                .stdout
                .read_until(b'\n', &mut line)
                .context("failed to read exiftool output")?;
            if read == 0 {
                bail!("exiftool exited unexpectedly");
            }
            let text = String::from_utf8_lossy(&line);
            if text.trim_end() == READY_MARKER {
                break;
            }
            output.push_str(&text);
        }
        Ok(output)
    }

    /// 回應讀到一半失敗時無法再對齊後續請求，直接結束程序
    fn abandon(&mut self) {
        if self.stdin.take().is_some() {
            warn!("[EXIF] exiftool session is out of sync, terminating it");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }

    /// 結束 exiftool 程序
    pub fn close(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin.write_all(b"-stay_open\nFalse\n")?;
            stdin.flush()?;
        }
        self.child.wait().context("failed to wait for exiftool")?;
        Ok(())
    }
}

impl MetadataBackend for ExifToolSession {
    fn read_fields(&mut self, path: &Path) -> Result<Option<MetadataFields>> {
        let Some(path_str) = path.to_str() else {
            bail!("path is not valid UTF-8: {}", path.display());
        };
        if path_str.contains('\n') {
            bail!("path contains a newline: {}", path.display());
        }

        let output = self.execute(path_str)?;
        parse_json_output(&output)
            .with_context(|| format!("failed to decode exiftool output for {}", path.display()))
    }
}

impl Drop for ExifToolSession {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            if let Err(e) = self.shutdown() {
                warn!("[EXIF] Failed to close exiftool: {e}");
            }
        }
    }
}

/// 解析 `-json` 輸出，空白輸出或空陣列視為沒有中繼資料
pub fn parse_json_output(output: &str) -> Result<Option<MetadataFields>> {
    if output.trim().is_empty() {
        return Ok(None);
    }
    let entries: Vec<MetadataFields> = serde_json::from_str(output)?;
    Ok(entries.into_iter().next())
}

/// 共用的中繼資料擷取器
///
/// 後端以 mutex 保護，整個系統同一時間只會有一個擷取請求
pub struct MetadataExtractor<B> {
    backend: Mutex<B>,
    debug: bool,
}

impl<B: MetadataBackend> MetadataExtractor<B> {
    pub const fn new(backend: B, debug: bool) -> Self {
        Self {
            backend: Mutex::new(backend),
            debug,
        }
    }

    pub fn read_fields(&self, path: &Path) -> Result<Option<MetadataFields>> {
        let fields = {
            let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
            backend.read_fields(path)?
        };

        if self.debug {
            if let Some(fields) = &fields {
                match serde_json::to_string_pretty(fields) {
                    Ok(json) => debug!("Metadata for {}:\n{json}", path.display()),
                    Err(e) => warn!("[EXIF] Failed to marshal metadata for {}: {e}", path.display()),
                }
            }
        }

        Ok(fields)
    }

    pub fn into_inner(self) -> B {
        self.backend.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
