//! # arcovid - Argentine COVID-19 report scraper
//!
//! 阿根廷疫情数据抓取库：从卫生部日报 PDF 中抽取各省确诊人数，
//! 并整理 JHU CSSE 全球时间序列。
//!
//! ## 功能特性
//!
//! - 自由文本地名 -> 阿根廷省份推断（字符多重集重叠相似度）
//! - 布宜诺斯艾利斯市/省的快捷判断（含 "Bs As" 简写）
//! - 日报文本正则抽取（数字 + 地名，括号数字 + 地名）
//! - PDF 本地缓存，重复运行不重复下载
//! - 全球时间序列宽表转长表、7 日滚动增长率、里程碑天数
//!
//! ## 快速开始
//!
//! ```rust
//! use arcovid::ProvinceInferrer;
//!
//! let inferrer = ProvinceInferrer::new();
//!
//! // 重音和大小写不影响匹配
//! let m = inferrer.infer("CORDOBA");
//! assert_eq!(m.province, "Córdoba");
//! assert_eq!(m.score, 1.0);
//!
//! // 布宜诺斯艾利斯走快捷路径
//! let m = inferrer.infer("Ciudad Autónoma de Buenos Aires");
//! assert_eq!(m.province, "Ciudad autonoma de Buenos Aires");
//!
//! // 从日报文本中抽取候选
//! let found = arcovid::extract_candidates("Se confirmaron 25 en Salta.");
//! assert_eq!(found[0].count, 25);
//! assert_eq!(found[0].place, "Salta");
//! ```

mod cache;
mod catalog;
mod config;
mod error;
mod extract;
mod fetch;
mod inference;
mod pdf;
mod record;
mod report;
mod similarity;
pub mod timeseries;

pub use cache::PdfCache;
pub use catalog::{load_provinces, Catalog, CITY_OF_BUENOS_AIRES, PROVINCE_OF_BUENOS_AIRES};
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{clean_page_text, extract_candidates, extract_date, is_boilerplate};
pub use fetch::{discover_report_links, fetch_report_links, Fetch, HttpClient};
pub use inference::ProvinceInferrer;
pub use pdf::{first_page_text, first_page_text_from_mem};
pub use record::{Candidate, ProvinceMatch, ReportRecord};
pub use report::{collect_reports, records_for_link, resolve_candidates};
pub use similarity::{fold, similarity};
pub use timeseries::{fetch_global_table, GlobalRow};

/// 便捷函数：使用全局推断器推断省份
///
/// ```rust
/// let m = arcovid::infer_province("Pcia de Bs As");
/// assert_eq!(m.province, "Provincia de Buenos Aires");
/// assert_eq!(m.score, 1.0);
/// ```
pub fn infer_province(text: &str) -> ProvinceMatch {
    ProvinceInferrer::global().infer(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_province_shortcut() {
        assert_eq!(
            infer_province("Ciudad Autónoma de Buenos Aires"),
            ProvinceMatch::new("Ciudad autonoma de Buenos Aires", 1.0)
        );
        assert_eq!(
            infer_province("Pcia de Bs As"),
            ProvinceMatch::new("Provincia de Buenos Aires", 1.0)
        );
    }

    #[test]
    fn test_infer_province_scored() {
        let m = infer_province("Rio Negro");
        assert_eq!(m.province, "Río Negro");
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_similarity_reexport() {
        assert_eq!(similarity(&fold("Córdoba"), &fold("CORDOBA")), 1.0);
    }

    #[test]
    fn test_extract_then_infer() {
        let found = extract_candidates("1234 ABC Córdoba Capital");
        assert_eq!(found, vec![Candidate::new(1234, "Córdoba Capital")]);
    }
}
