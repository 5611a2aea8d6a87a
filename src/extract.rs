//! 日报文本字段抽取
//!
//! 全部是纯函数，只处理文本，不做任何网络或文件 I/O。

use crate::error::{Error, Result};
use crate::record::Candidate;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// 地名短语：首个词大写字母开头，后接小写字母，或是至少四个字母的全大写词；
/// 其后可跟任意词。三个字母以内的全大写词只能是连接词
const PLACE: &str = r"(?P<place>[A-Z](?:\p{Ll}\w*|[A-Z]{3,}\w*)(?:\s\w+)*)";

/// 连接词：不超过三个字母的小写词，或不超过三个字母的大写缩写
const CONNECTOR: &str = r"(?: *(?:[a-z]{0,3}|[A-Z]{1,3}))";

/// 模式 A：数字 + 0~2 个连接词 + 地名
static NUMBER_THEN_PLACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?P<num>[0-9]+)(?P<middle>{CONNECTOR}{{0,2}} *){PLACE}"))
        .expect("pattern A is valid")
});

/// 模式 B：括号数字 + 0~5 个连接词 + 地名
static PAREN_NUMBER_THEN_PLACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\((?P<num>[0-9]+)\)(?P<middle>{CONNECTOR}{{0,5}} *){PLACE}"))
        .expect("pattern B is valid")
});

/// 链接中的 `日-月-年`
static LINK_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)-([0-9]+)-([0-9]+)").expect("date pattern is valid"));

/// 页眉页脚里的误匹配关键词
const BOILERPLATE: [&str; 3] = ["argentina", "covid", "informe"];

/// 抽取前清理页面文本：去掉 "personas"，换行替换为空格
pub fn clean_page_text(text: &str) -> String {
    text.replace("personas", "")
        .replace(|c: char| c == '\n' || c == '\r', " ")
}

/// 从文本中抽取 (人数, 地名) 候选
///
/// 先收集模式 A 的全部匹配，再收集模式 B 的，两者结果直接拼接，不去重。
///
/// ```rust
/// use arcovid::extract_candidates;
///
/// let found = extract_candidates("1234 ABC Córdoba Capital");
/// assert_eq!(found[0].count, 1234);
/// assert_eq!(found[0].place, "Córdoba Capital");
/// ```
pub fn extract_candidates(text: &str) -> Vec<Candidate> {
    [&*NUMBER_THEN_PLACE, &*PAREN_NUMBER_THEN_PLACE]
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text))
        .filter_map(|caps| {
            // 超出 u64 的数字不可能是人数
            let count = caps["num"].parse().ok()?;
            Some(Candidate::new(count, &caps["place"]))
        })
        .collect()
}

/// 地名是否是页眉页脚误匹配
pub fn is_boilerplate(place: &str) -> bool {
    let lower = place.to_lowercase();
    BOILERPLATE.iter().any(|word| lower.contains(word))
}

/// 从报告链接的最后一段解析日期（`日-月-年`，两位年份按 20xx 处理）
pub fn extract_date(link: &str) -> Result<NaiveDate> {
    let last = link.rsplit('/').next().unwrap_or(link);
    let caps = LINK_DATE.captures(last).ok_or_else(|| Error::MissingDate {
        link: link.to_string(),
    })?;

    let part = |i: usize| -> Result<u32> {
        caps[i]
            .parse()
            .map_err(|_| Error::InvalidDate(caps[0].to_string()))
    };
    let (day, month, mut year) = (part(1)?, part(2)?, part(3)?);
    if year < 100 {
        year += 2000;
    }

    let year = i32::try_from(year).map_err(|_| Error::InvalidDate(caps[0].to_string()))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| Error::InvalidDate(caps[0].to_string()))
}
