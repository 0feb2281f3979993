use crate::cli::Cli;
use crate::config::types::{Config, DatePolicy, OutputTarget};
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

impl Config {
    /// 由命令列參數建立設定並驗證
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let config = Self::from_cli_unchecked(cli)?;
        validate_input_dir(&config.input_path)?;
        Ok(config)
    }

    /// 不檢查輸入資料夾是否存在的版本
    pub(crate) fn from_cli_unchecked(cli: Cli) -> Result<Self> {
        let (Some(input), Some(output)) = (non_empty(cli.input), non_empty(cli.output)) else {
            bail!("Input (-i) and output (-o) directories are required");
        };
        if cli.workers == 0 {
            bail!("-workers must be at least 1");
        }
        if cli.buffer == 0 {
            bail!("-buffer must be at least 1");
        }

        Ok(Self {
            input_path: PathBuf::from(input),
            output: OutputTarget::classify(&output),
            workers: cli.workers,
            buffer: cli.buffer,
            copy_mode: cli.copy,
            dry_run: cli.dry_run,
            debug: cli.debug,
            date_policy: DatePolicy {
                only_date_time_original: cli.only_datetimeoriginal,
                use_file_modify_date: cli.use_file_modify_date,
            },
        })
    }
}

/// 輸入路徑必須是已存在的資料夾
fn validate_input_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Input (-i) path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("Input (-i) path is not a directory: {}", path.display());
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
