use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use thiserror::Error;

/// 完整時間含時區，秒數後可接小數
const FORMAT_WITH_OFFSET: &str = "%Y:%m:%d %H:%M:%S%.f%:z";
/// 完整時間不含時區，視為 UTC
const FORMAT_WITHOUT_OFFSET: &str = "%Y:%m:%d %H:%M:%S%.f";
/// 只有日期，視為當天 00:00 UTC
const FORMAT_DATE_ONLY: &str = "%Y:%m:%d";

/// 可提供拍攝日期的中繼資料欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    DateTimeOriginal,
    CreateDate,
    DateCreated,
    /// 檔案系統修改時間，只作為最後手段
    FileModifyDate,
}

impl DateField {
    /// 中繼資料欄位的查詢順序（不含檔案修改時間）
    pub const METADATA_FIELDS: [Self; 3] =
        [Self::DateTimeOriginal, Self::CreateDate, Self::DateCreated];

    /// exiftool 輸出中的標籤名稱
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::DateTimeOriginal => "DateTimeOriginal",
            Self::CreateDate => "CreateDate",
            Self::DateCreated => "DateCreated",
            Self::FileModifyDate => "FileModifyDate",
        }
    }

    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::DateTimeOriginal)
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized date format: {0}")]
pub struct DateParseError(pub String);

/// 解析 EXIF 日期字串，依序嘗試三種格式，第一個成功者為準
pub fn parse_exif_date(value: &str) -> Result<DateTime<FixedOffset>, DateParseError> {
    if !has_padded_layout(value) {
        return Err(DateParseError(value.to_string()));
    }
    if let Ok(t) = DateTime::parse_from_str(value, FORMAT_WITH_OFFSET) {
        return Ok(t);
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(value, FORMAT_WITHOUT_OFFSET) {
        return Ok(t.and_utc().fixed_offset());
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, FORMAT_DATE_ONLY) {
        return Ok(d.and_time(NaiveTime::MIN).and_utc().fixed_offset());
    }
    Err(DateParseError(value.to_string()))
}

/// chrono 接受前置空白與未補零的欄位，先檢查 `YYYY:MM:DD[ HH:MM:SS]` 的固定寬度
fn has_padded_layout(value: &str) -> bool {
    let bytes = value.as_bytes();
    let digits = |start: usize, end: usize| {
        bytes
            .get(start..end)
            .is_some_and(|part| part.iter().all(u8::is_ascii_digit))
    };
    let byte_is = |index: usize, expected: u8| bytes.get(index) == Some(&expected);

    let date = digits(0, 4) && byte_is(4, b':') && digits(5, 7) && byte_is(7, b':') && digits(8, 10);
    if !date {
        return false;
    }
    if bytes.len() == 10 {
        return true;
    }
    byte_is(10, b' ')
        && digits(11, 13)
        && byte_is(13, b':')
        && digits(14, 16)
        && byte_is(16, b':')
        && digits(17, 19)
}
