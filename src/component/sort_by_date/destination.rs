use crate::config::OutputTarget;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, FixedOffset};
use std::fmt;
use std::path::{Path, PathBuf};

/// 檔案的目的資料夾與目的路徑
///
/// 目的地已有同名檔案時會直接覆蓋，不做重新命名
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Local {
        dir: PathBuf,
        file: PathBuf,
    },
    Remote {
        host: String,
        dir: String,
        file: String,
    },
}

impl Destination {
    /// rsync 使用的 `host:path` 目標
    #[must_use]
    pub fn rsync_target(&self) -> Option<String> {
        match self {
            Self::Local { .. } => None,
            Self::Remote { host, file, .. } => Some(format!("{host}:{file}")),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { file, .. } => write!(f, "{}", file.display()),
            Self::Remote { host, file, .. } => write!(f, "{host}:{file}"),
        }
    }
}

/// `YYYY/MM` 相對路徑的兩個部分
#[must_use]
pub fn year_month(date: &DateTime<FixedOffset>) -> (String, String) {
    (format!("{:04}", date.year()), format!("{:02}", date.month()))
}

pub fn resolve_destination(
    output: &OutputTarget,
    date: &DateTime<FixedOffset>,
    source: &Path,
) -> Result<Destination> {
    let file_name = source
        .file_name()
        .with_context(|| format!("no file name in {}", source.display()))?;
    let (year, month) = year_month(date);

    match output {
        OutputTarget::Local(root) => {
            let dir = root.join(&year).join(&month);
            let file = dir.join(file_name);
            Ok(Destination::Local { dir, file })
        }
        OutputTarget::Remote(remote) => {
            let file_name = file_name
                .to_str()
                .with_context(|| format!("file name is not valid UTF-8: {}", source.display()))?;
            let base = remote.base_dir.trim_end_matches('/');
            let dir = if remote.base_dir.is_empty() {
                format!("{year}/{month}")
            } else {
                format!("{base}/{year}/{month}")
            };
            let file = format!("{dir}/{file_name}");
            Ok(Destination::Remote {
                host: remote.host.clone(),
                dir,
                file,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::parse_exif_date;

    fn date(value: &str) -> DateTime<FixedOffset> {
        parse_exif_date(value).unwrap()
    }

    #[test]
    fn test_year_month_padding() {
        assert_eq!(
            year_month(&date("2023:05:10")),
            ("2023".to_string(), "05".to_string())
        );
        assert_eq!(
            year_month(&date("2023:12:01")),
            ("2023".to_string(), "12".to_string())
        );
    }

    #[test]
    fn test_local_destination() {
        let output = OutputTarget::classify("/output");
        let destination =
            resolve_destination(&output, &date("2023:05:10"), Path::new("/in/a/photo1.jpg"))
                .unwrap();

        assert_eq!(
            destination,
            Destination::Local {
                dir: PathBuf::from("/output/2023/05"),
                file: PathBuf::from("/output/2023/05/photo1.jpg"),
            }
        );
        assert_eq!(destination.rsync_target(), None);
    }

    #[test]
    fn test_remote_destination() {
        let output = OutputTarget::classify("user@host:/backup");
        let destination =
            resolve_destination(&output, &date("2024:01:01"), Path::new("/in/photo2.jpg")).unwrap();

        assert_eq!(
            destination,
            Destination::Remote {
                host: "user@host".to_string(),
                dir: "/backup/2024/01".to_string(),
                file: "/backup/2024/01/photo2.jpg".to_string(),
            }
        );
        assert_eq!(
            destination.rsync_target().as_deref(),
            Some("user@host:/backup/2024/01/photo2.jpg")
        );
        assert_eq!(destination.to_string(), "user@host:/backup/2024/01/photo2.jpg");
    }

    #[test]
    fn test_remote_destination_trailing_slash_and_empty_base() {
        let output = OutputTarget::classify("user@host:/backup/");
        let Destination::Remote { dir, .. } =
            resolve_destination(&output, &date("2024:01:01"), Path::new("a.jpg")).unwrap()
        else {
            panic!("expected remote destination");
        };
        assert_eq!(dir, "/backup/2024/01");

        let output = OutputTarget::classify("user@host:");
        let Destination::Remote { file, .. } =
            resolve_destination(&output, &date("2024:01:01"), Path::new("a.jpg")).unwrap()
        else {
            panic!("expected remote destination");
        };
        assert_eq!(file, "2024/01/a.jpg");
    }

    #[test]
    fn test_source_without_file_name() {
        let output = OutputTarget::classify("/output");
        assert!(resolve_destination(&output, &date("2023:05:10"), Path::new("/")).is_err());
    }
}
