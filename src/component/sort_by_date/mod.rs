//! 依拍攝日期整理媒體檔案
//!
//! 掃描輸入資料夾，從中繼資料取得拍攝日期，
//! 以 worker pool 將檔案移動或複製到 `YYYY/MM` 資料夾（本機或遠端）

mod date_resolver;
mod destination;
mod main;
mod transfer;
mod worker_pool;

pub use date_resolver::{DateRejection, ResolvedDate, accept, extract_date, resolve_date};
pub use destination::{Destination, resolve_destination, year_month};
pub use main::{BatchSummary, SortByDate};
pub use transfer::TransferExecutor;
pub use worker_pool::{PoolReport, WorkerPool};
