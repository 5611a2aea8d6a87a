//! 记录数据结构

use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 省份推断结果
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProvinceMatch {
    /// 目录中的省份名称
    pub province: String,
    /// 置信度，`[0, 1]`
    pub score: f64,
}

impl ProvinceMatch {
    pub fn new(province: impl Into<String>, score: f64) -> Self {
        Self {
            province: province.into(),
            score,
        }
    }

    /// 是否为完全匹配（含快捷路径）
    pub fn is_exact(&self) -> bool {
        self.score >= 1.0
    }
}

impl From<ProvinceMatch> for (String, f64) {
    fn from(m: ProvinceMatch) -> Self {
        (m.province, m.score)
    }
}

/// 从报告文本中抽取出的 (人数, 地名) 候选
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    pub count: u64,
    pub place: String,
}

impl Candidate {
    pub fn new(count: u64, place: impl Into<String>) -> Self {
        Self {
            count,
            place: place.into(),
        }
    }
}

/// 日报记录：每个正则匹配生成一条，生成后不再修改
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportRecord {
    /// 报告日期（来自链接）
    pub date: NaiveDate,
    /// 抽取出的原始地名
    pub place: String,
    /// 推断出的省份
    pub province: String,
    /// 推断置信度
    pub score: f64,
    /// 感染人数
    pub infected: u64,
}

impl ReportRecord {
    pub fn new(date: NaiveDate, candidate: Candidate, inferred: ProvinceMatch) -> Self {
        Self {
            date,
            place: candidate.place,
            province: inferred.province,
            score: inferred.score,
            infected: candidate.count,
        }
    }
}
