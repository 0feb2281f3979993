use crate::config::{DEFAULT_BUFFER, DEFAULT_WORKERS};
use clap::Parser;
use std::ffi::OsString;

const AFTER_HELP: &str = "\
Examples:
  media_sort_by_date -i /path/to/input -o /path/to/output
  media_sort_by_date -i /path/to/input -o user@host:/remote/path --copy
  media_sort_by_date -i /path/to/input -o /path/to/output --dry-run";

/// Organize media files by date (YYYY/MM) using EXIF data, with optional remote rsync transfer.
#[derive(Debug, Clone, Parser)]
#[command(name = "media_sort_by_date", version, after_help = AFTER_HELP)]
pub struct Cli {
    /// Input directory
    #[arg(short = 'i', value_name = "DIR", allow_hyphen_values = true)]
    pub input: Option<String>,

    /// Output: local directory or remote destination formatted user@host:/remote/path
    #[arg(short = 'o', value_name = "DIR|DEST", allow_hyphen_values = true)]
    pub output: Option<String>,

    /// Number of concurrent workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Job queue capacity
    #[arg(long, default_value_t = DEFAULT_BUFFER)]
    pub buffer: usize,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Copy instead of move (keep original files)
    #[arg(long)]
    pub copy: bool,

    /// Show what would be done, without moving/copying files
    #[arg(long)]
    pub dry_run: bool,

    /// Only process files whose date comes from the DateTimeOriginal tag
    #[arg(long = "only-datetimeoriginal")]
    pub only_datetimeoriginal: bool,

    /// Use the file modify date as a last fallback
    #[arg(long)]
    pub use_file_modify_date: bool,
}

impl Cli {
    /// 解析程式參數，同時接受單一破折號的長參數
    #[must_use]
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// 後面接獨立值的參數，其值不做轉換
const VALUE_FLAGS: [&str; 6] = ["-i", "-o", "-workers", "--workers", "-buffer", "--buffer"];

/// 將 `-workers` 這類單一破折號的長參數轉成 `--workers`
///
/// 單字元短參數（`-i`、`-o`、`-h`）與參數值（例如 `-o -archive`）維持原樣
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut expects_value = false;
    for (index, arg) in args.into_iter().enumerate() {
        if index == 0 || std::mem::take(&mut expects_value) {
            normalized.push(arg);
            continue;
        }
        let Some(s) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        expects_value = VALUE_FLAGS.contains(&s);
        if is_single_dash_long(s) {
            normalized.push(OsString::from(format!("-{s}")));
        } else {
            normalized.push(arg);
        }
    }
    normalized
}

fn is_single_dash_long(arg: &str) -> bool {
    let Some(name) = arg.strip_prefix('-') else {
        return false;
    };
    let name = name.split_once('=').map_or(name, |(n, _)| n);
    !name.starts_with('-')
        && name.len() > 1
        && name.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}
