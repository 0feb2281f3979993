use crate::tools::DateField;
use std::path::PathBuf;

/// 預設同時處理的 worker 數量
pub const DEFAULT_WORKERS: usize = 8;
/// 預設工作佇列容量
pub const DEFAULT_BUFFER: usize = 100;

/// 遠端目的地（`user@host:/path`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    /// `:` 之前的部分，包含 `user@`
    pub host: String,
    /// `:` 之後的遠端基底路徑
    pub base_dir: String,
}

/// 輸出目標，啟動時分類一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Local(PathBuf),
    Remote(RemoteTarget),
}

impl OutputTarget {
    /// 同時包含 `@` 與 `:` 視為遠端，其餘皆為本機路徑
    #[must_use]
    pub fn classify(output: &str) -> Self {
        if output.contains('@') {
            if let Some((host, base_dir)) = output.split_once(':') {
                return Self::Remote(RemoteTarget {
                    host: host.to_string(),
                    base_dir: base_dir.to_string(),
                });
            }
        }
        Self::Local(PathBuf::from(output))
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// 日期來源規則
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatePolicy {
    /// 只接受來自 DateTimeOriginal 的日期
    pub only_date_time_original: bool,
    /// 找不到中繼資料日期時，以檔案修改時間作為最後手段
    pub use_file_modify_date: bool,
}

impl DatePolicy {
    /// 依序查詢的日期欄位
    #[must_use]
    pub fn search_order(&self) -> Vec<DateField> {
        let mut fields = DateField::METADATA_FIELDS.to_vec();
        if self.use_file_modify_date {
            fields.push(DateField::FileModifyDate);
        }
        fields
    }
}

/// 執行期設定，建立後不再修改
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub output: OutputTarget,
    pub workers: usize,
    pub buffer: usize,
    pub copy_mode: bool,
    pub dry_run: bool,
    pub debug: bool,
    pub date_policy: DatePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_local() {
        assert_eq!(
            OutputTarget::classify("/output"),
            OutputTarget::Local(PathBuf::from("/output"))
        );
        // 只有其中一個符號仍然是本機路徑
        assert!(!OutputTarget::classify("/data/me@home").is_remote());
        assert!(!OutputTarget::classify("C:/photos").is_remote());
    }

    #[test]
    fn test_classify_remote() {
        let target = OutputTarget::classify("user@host:/remote/path");
        assert_eq!(
            target,
            OutputTarget::Remote(RemoteTarget {
                host: "user@host".to_string(),
                base_dir: "/remote/path".to_string(),
            })
        );
    }

    #[test]
    fn test_classify_remote_splits_on_first_colon() {
        let OutputTarget::Remote(remote) = OutputTarget::classify("me@nas:/vol:1/photos") else {
            panic!("expected remote target");
        };
        assert_eq!(remote.host, "me@nas");
        assert_eq!(remote.base_dir, "/vol:1/photos");
    }

    #[test]
    fn test_search_order_without_file_modify_date() {
        let policy = DatePolicy::default();
        assert_eq!(
            policy.search_order(),
            vec![
                DateField::DateTimeOriginal,
                DateField::CreateDate,
                DateField::DateCreated
            ]
        );
    }

    #[test]
    fn test_search_order_with_file_modify_date() {
        let policy = DatePolicy {
            use_file_modify_date: true,
            ..DatePolicy::default()
        };
        assert_eq!(policy.search_order().last(), Some(&DateField::FileModifyDate));
        assert_eq!(policy.search_order().len(), 4);
    }
}
