//! 日报抽取流水线
//!
//! 索引页 -> 日报链接 -> 缓存 PDF -> 首页文本 -> 候选 -> 过滤 -> 省份推断。

use crate::cache::PdfCache;
use crate::error::Result;
use crate::extract::{clean_page_text, extract_candidates, extract_date, is_boilerplate};
use crate::fetch::{fetch_report_links, Fetch};
use crate::inference::ProvinceInferrer;
use crate::pdf::first_page_text;
use crate::record::ReportRecord;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// 把一页日报文本转换成记录
///
/// 先清理文本，再抽取候选，丢弃页眉页脚误匹配，最后逐条推断省份。
pub fn resolve_candidates(
    date: NaiveDate,
    page_text: &str,
    inferrer: &ProvinceInferrer,
) -> Vec<ReportRecord> {
    let text = clean_page_text(page_text);
    extract_candidates(&text)
        .into_iter()
        .filter(|c| !is_boilerplate(&c.place))
        .map(|c| {
            let inferred = inferrer.infer(&c.place);
            debug!(place = %c.place, province = %inferred.province, score = inferred.score, "candidate");
            ReportRecord::new(date, c, inferred)
        })
        .collect()
}

/// 处理单个日报链接
pub fn records_for_link(
    fetcher: &impl Fetch,
    cache: &PdfCache,
    inferrer: &ProvinceInferrer,
    link: &str,
) -> Result<Vec<ReportRecord>> {
    let path = cache.fetch(fetcher, link)?;
    let text = first_page_text(&path)?;
    if text.trim().is_empty() {
        warn!(link, "first page has no text");
    }
    let date = extract_date(link)?;
    Ok(resolve_candidates(date, &text, inferrer))
}

/// 运行完整流水线，结果按日期排序（同一天内保持抽取顺序）
pub fn collect_reports(
    fetcher: &impl Fetch,
    cache: &PdfCache,
    inferrer: &ProvinceInferrer,
    index_url: &str,
) -> Result<Vec<ReportRecord>> {
    let links = fetch_report_links(fetcher, index_url)?;

    let mut records = Vec::new();
    for link in &links {
        records.extend(records_for_link(fetcher, cache, inferrer, link)?);
    }
    records.sort_by_key(|r| r.date);

    info!(reports = links.len(), records = records.len(), "report extraction done");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pdf::tests::build_pdf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct OnePdf(Vec<u8>);

    impl Fetch for OnePdf {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_resolve_candidates() {
        let text = "Informe diario\n25 personas en Salta, 3 en Ciudad de Buenos Aires. 10 Argentina";
        let records = resolve_candidates(date(2020, 4, 3), text, &ProvinceInferrer::new());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].infected, 25);
        assert_eq!(records[0].place, "Salta");
        assert_eq!(records[0].province, "Salta");
        assert_eq!(records[0].score, 1.0);
        assert_eq!(records[1].infected, 3);
        assert_eq!(records[1].province, "Ciudad autonoma de Buenos Aires");
        assert!(records.iter().all(|r| r.date == date(2020, 4, 3)));
    }

    #[test]
    fn test_boilerplate_dropped() {
        let text = "19 COVID Informe. (2020) Argentina";
        assert!(resolve_candidates(date(2020, 4, 3), text, &ProvinceInferrer::new()).is_empty());
    }

    #[test]
    fn test_records_for_link() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = PdfCache::new(tmp.path());
        let fetcher = OnePdf(build_pdf(&["12 en Chaco"]));

        let records = records_for_link(
            &fetcher,
            &cache,
            &ProvinceInferrer::new(),
            "https://host/files/05-04-20-reporte-diario.pdf",
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].province, "Chaco");
        assert_eq!(records[0].infected, 12);
        assert_eq!(records[0].date, date(2020, 4, 5));
        assert!(cache.contains("https://host/files/05-04-20-reporte-diario.pdf"));
    }

    #[test]
    fn test_records_for_link_without_date() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = PdfCache::new(tmp.path());
        let fetcher = OnePdf(build_pdf(&["12 en Chaco"]));

        let err = records_for_link(
            &fetcher,
            &cache,
            &ProvinceInferrer::new(),
            "https://host/files/reporte-diario.pdf",
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingDate { .. }));
    }
}
