//! 功能元件模組

pub mod sort_by_date;

pub use sort_by_date::SortByDate;
