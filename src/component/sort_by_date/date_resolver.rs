use crate::config::DatePolicy;
use crate::tools::{
    DateField, MetadataBackend, MetadataExtractor, MetadataFields, parse_exif_date,
};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use log::{info, warn};
use std::path::Path;
use thiserror::Error;

/// 從中繼資料找到的日期與其來源欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub field: DateField,
    pub timestamp: DateTime<FixedOffset>,
}

/// 檔案沒有可用日期的原因
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRejection {
    #[error("no metadata extracted")]
    NoMetadata,
    #[error("no valid date found in EXIF or file system")]
    NoValidDate,
    #[error("DateTimeOriginal not found (date came from {0})")]
    NotPrimaryField(DateField),
}

/// 依 `policy.search_order()` 找出第一個可解析的日期
///
/// 欄位存在但格式錯誤時記錄後繼續找下一個欄位
pub fn resolve_date(
    fields: &MetadataFields,
    policy: &DatePolicy,
    path: &Path,
) -> Option<ResolvedDate> {
    for field in policy.search_order() {
        let Some(value) = fields.get(field.tag()).and_then(|v| v.as_str()) else {
            continue;
        };
        match parse_exif_date(value) {
            Ok(timestamp) => return Some(ResolvedDate { field, timestamp }),
            Err(e) => warn!(
                "[EXIF] Error parsing date '{value}' for tag '{field}' in file {}: {e}",
                path.display()
            ),
        }
    }
    None
}

/// 套用 `only_date_time_original` 規則
pub fn accept(
    resolved: Option<ResolvedDate>,
    policy: &DatePolicy,
) -> Result<DateTime<FixedOffset>, DateRejection> {
    let resolved = resolved.ok_or(DateRejection::NoValidDate)?;
    if policy.only_date_time_original && !resolved.field.is_primary() {
        return Err(DateRejection::NotPrimaryField(resolved.field));
    }
    Ok(resolved.timestamp)
}

/// 向後端查詢並決定檔案的拍攝日期
pub fn extract_date<B: MetadataBackend>(
    extractor: &MetadataExtractor<B>,
    policy: &DatePolicy,
    path: &Path,
) -> Result<DateTime<FixedOffset>> {
    let fields = extractor
        .read_fields(path)
        .with_context(|| format!("failed to extract metadata for {}", path.display()))?;

    let Some(fields) = fields else {
        warn!("[EXIF] No metadata extracted for {}", path.display());
        return Err(DateRejection::NoMetadata.into());
    };

    let resolved = resolve_date(&fields, policy, path);
    if resolved.is_none() {
        info!("[EXIF] No valid date found in metadata for {}", path.display());
    }

    accept(resolved, policy).map_err(|rejection| {
        if let DateRejection::NotPrimaryField(_) = rejection {
            info!(
                "Skipping {} because it does not have DateTimeOriginal tag",
                path.display()
            );
        }
        rejection.into()
    })
}
