//! 错误类型定义

use thiserror::Error;

/// 抓取与解析错误
#[derive(Debug, Error)]
pub enum Error {
    /// 网络请求失败
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 文件读写失败（缓存目录等）
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF 无法解析
    #[error("Failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    /// CSV 无法解析
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// 链接中没有 `日-月-年` 日期
    #[error("No day-month-year date in link: {link}")]
    MissingDate { link: String },

    /// 日期不存在或格式错误
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// 数值无法解析
    #[error("Invalid count: {0}")]
    InvalidCount(String),

    /// 宽表缺少必需的元数据列
    #[error("Missing CSV column: {0}")]
    MissingColumn(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
