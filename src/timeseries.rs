//! 全球时间序列流水线
//!
//! JHU CSSE 的宽表每个日期一列。这里先转成长表，按国家汇总，
//! 合并确诊/治愈/死亡三个指标，再计算滚动增长率和里程碑天数。

use crate::config::{Config, CONFIRMED_CSV, DEATHS_CSV, RECOVERED_CSV};
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::similarity::strip_accents;
use chrono::{Duration, NaiveDate};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// 日增长率上限，裁掉数据修正造成的尖峰
pub const GROWTH_CAP: f64 = 1.6;

/// 滚动窗口天数
pub const GROWTH_WINDOW: usize = 7;

const PROVINCE_COLUMN: &str = "Province/State";
const COUNTRY_COLUMN: &str = "Country/Region";
const LAT_COLUMN: &str = "Lat";
const LONG_COLUMN: &str = "Long";

const ARGENTINA: &str = "Argentina";

/// 上游数据相对其他国家晚报一天，从这一天起整体后移
fn argentina_shift_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 22).expect("valid date")
}

/// 三个指标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Confirmed,
    Recovered,
    Deaths,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Recovered, Metric::Deaths];

    /// 相对于 CSV 根地址的文件路径
    pub fn file(self) -> &'static str {
        match self {
            Metric::Confirmed => CONFIRMED_CSV,
            Metric::Recovered => RECOVERED_CSV,
            Metric::Deaths => DEATHS_CSV,
        }
    }
}

/// 长表中的一行：某地区某天的累计数
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub province: String,
    pub country: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub date: NaiveDate,
    pub cnt: i64,
}

/// 按国家汇总后的日累计数
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyCount {
    pub date: NaiveDate,
    pub country: String,
    pub cnt: i64,
}

/// 每个国家的四个里程碑日期
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Milestones {
    /// 确诊 > 0 的第一天
    pub first_infection: Option<NaiveDate>,
    /// 确诊 > 10 的第一天
    pub tenth_infection: Option<NaiveDate>,
    /// 死亡 > 0 的第一天
    pub first_death: Option<NaiveDate>,
    /// 死亡 > 10 的第一天
    pub tenth_death: Option<NaiveDate>,
}

/// 最终输出表的一行
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalRow {
    pub date: NaiveDate,
    pub country: String,
    pub confirmed: i64,
    pub recovered: i64,
    pub death: i64,
    pub confirmed_growth_rate: f64,
    pub death_growth_rate: f64,
    pub first_infection_date: Option<NaiveDate>,
    pub days_from_first_infection: Option<i64>,
    pub tenth_infection_date: Option<NaiveDate>,
    pub days_from_tenth_infection: Option<i64>,
    pub first_death_date: Option<NaiveDate>,
    pub days_from_first_death: Option<i64>,
    pub tenth_death_date: Option<NaiveDate>,
    pub days_from_tenth_death: Option<i64>,
}

/// 解析 `M/D/YY` 或 `M/D/YYYY` 形式的列名
pub fn parse_header_date(header: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate(header.to_string());

    let parts: Vec<&str> = header.trim().split('/').collect();
    let [month, day, year] = parts.as_slice() else {
        return Err(invalid());
    };
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;
    let mut year: i32 = year.parse().map_err(|_| invalid())?;
    if year < 100 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// 宽表转长表
///
/// 四个元数据列之外的每一列都是日期。空单元格跳过，值为 0 的保留。
pub fn reshape_wide(csv_text: &str) -> Result<Vec<LongRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    // 列名去重音，兼容 "Country/Región" 这类写法
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| strip_accents(h.trim_start_matches('\u{feff}').trim()))
        .collect();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(Error::MissingColumn(name))
    };
    let province_idx = column(PROVINCE_COLUMN)?;
    let country_idx = column(COUNTRY_COLUMN)?;
    let lat_idx = column(LAT_COLUMN)?;
    let long_idx = column(LONG_COLUMN)?;
    let meta = [province_idx, country_idx, lat_idx, long_idx];

    let date_columns = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !meta.contains(i))
        .map(|(i, h)| Ok((i, parse_header_date(h)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").trim();

        let province = field(province_idx).to_string();
        let country = field(country_idx).to_string();
        let lat: Option<f64> = field(lat_idx).parse().ok();
        let long: Option<f64> = field(long_idx).parse().ok();

        for &(i, date) in &date_columns {
            let value = field(i);
            if value.is_empty() {
                continue;
            }
            let cnt: i64 = value
                .parse()
                .map_err(|_| Error::InvalidCount(value.to_string()))?;
            rows.push(LongRow {
                province: province.clone(),
                country: country.clone(),
                lat,
                long,
                date,
                cnt,
            });
        }
    }

    Ok(rows)
}

/// 阿根廷 2020-03-22 及之后的日期整体后移一天
pub fn shift_argentina(rows: &mut [LongRow]) {
    let start = argentina_shift_start();
    for row in rows.iter_mut() {
        if row.country == ARGENTINA && row.date >= start {
            row.date += Duration::days(1);
        }
    }
}

/// 补上游缺失的 2020-03-22 布宜诺斯艾利斯确诊数
pub fn inject_missing_argentina(rows: &mut Vec<LongRow>) {
    rows.push(LongRow {
        province: "Buenos Aires".to_string(),
        country: ARGENTINA.to_string(),
        lat: None,
        long: None,
        date: argentina_shift_start(),
        cnt: 225,
    });
}

/// 对某个指标应用已知的上游数据修正
///
/// 日期后移对三个指标都生效；225 例只补到确诊上。
/// 上游缺的只是确诊这一行，把它补进治愈和死亡会凭空多出数据。
pub fn apply_source_corrections(rows: &mut Vec<LongRow>, metric: Metric) {
    shift_argentina(rows);
    if metric == Metric::Confirmed {
        inject_missing_argentina(rows);
    }
}

/// 按 (日期, 国家) 汇总各省/州，结果按日期、国家排序
pub fn aggregate_by_country(rows: &[LongRow]) -> Vec<DailyCount> {
    let mut totals: BTreeMap<(NaiveDate, &str), i64> = BTreeMap::new();
    for row in rows {
        *totals.entry((row.date, row.country.as_str())).or_insert(0) += row.cnt;
    }
    totals
        .into_iter()
        .map(|((date, country), cnt)| DailyCount {
            date,
            country: country.to_string(),
            cnt,
        })
        .collect()
}

/// 相邻两天的比值；0/0 没有定义
fn daily_ratio(previous: i64, current: i64) -> Option<f64> {
    let ratio = current as f64 / previous as f64;
    if ratio.is_nan() {
        None
    } else {
        Some(ratio.min(GROWTH_CAP))
    }
}

/// 7 日滚动平均增长率
///
/// 每日比值先封顶 1.6；窗口不足 7 天或窗口内有未定义比值时取 1.6。
/// 第一天没有前一天，因此前 7 行总是 1.6。
pub fn growth_rates(values: &[i64]) -> Vec<f64> {
    let ratios: Vec<Option<f64>> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| if i == 0 { None } else { daily_ratio(values[i - 1], v) })
        .collect();

    (0..values.len())
        .map(|i| {
            if i + 1 < GROWTH_WINDOW {
                return GROWTH_CAP;
            }
            let window = &ratios[i + 1 - GROWTH_WINDOW..=i];
            window
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|sum| sum / GROWTH_WINDOW as f64)
                .unwrap_or(GROWTH_CAP)
        })
        .collect()
}

fn first_date_where(
    dates: &[NaiveDate],
    values: &[i64],
    pred: impl Fn(i64) -> bool,
) -> Option<NaiveDate> {
    dates
        .iter()
        .zip(values)
        .filter(|(_, &v)| pred(v))
        .map(|(&d, _)| d)
        .min()
}

/// 计算一个国家的里程碑日期
pub fn milestones(dates: &[NaiveDate], confirmed: &[i64], deaths: &[i64]) -> Milestones {
    Milestones {
        first_infection: first_date_where(dates, confirmed, |v| v > 0),
        tenth_infection: first_date_where(dates, confirmed, |v| v > 10),
        first_death: first_date_where(dates, deaths, |v| v > 0),
        tenth_death: first_date_where(dates, deaths, |v| v > 10),
    }
}

/// 相对里程碑的天数：之前为负、当天为 0；里程碑不存在时为 None
pub fn days_from(date: NaiveDate, milestone: Option<NaiveDate>) -> Option<i64> {
    milestone.map(|m| (date - m).num_days())
}

/// 合并三个指标并计算派生列
///
/// 按 (国家, 日期) 全外连接，缺失值补 0。输出按国家、日期排序。
pub fn build_global_table(
    confirmed: &[DailyCount],
    recovered: &[DailyCount],
    deaths: &[DailyCount],
) -> Vec<GlobalRow> {
    let mut merged: BTreeMap<(&str, NaiveDate), [i64; 3]> = BTreeMap::new();
    for (slot, counts) in [confirmed, recovered, deaths].into_iter().enumerate() {
        for c in counts {
            merged.entry((c.country.as_str(), c.date)).or_insert([0; 3])[slot] = c.cnt;
        }
    }

    // 按国家分组；BTreeMap 的顺序保证同一国家的日期连续且有序
    let mut by_country: BTreeMap<&str, Vec<(NaiveDate, [i64; 3])>> = BTreeMap::new();
    for ((country, date), values) in merged {
        by_country.entry(country).or_default().push((date, values));
    }

    let mut table = Vec::new();
    for (country, days) in by_country {
        let dates: Vec<NaiveDate> = days.iter().map(|(d, _)| *d).collect();
        let confirmed: Vec<i64> = days.iter().map(|(_, v)| v[0]).collect();
        let deaths: Vec<i64> = days.iter().map(|(_, v)| v[2]).collect();

        let confirmed_growth = growth_rates(&confirmed);
        let death_growth = growth_rates(&deaths);
        let m = milestones(&dates, &confirmed, &deaths);
        debug!(country, ?m, "milestones");

        for (i, (date, [c, r, d])) in days.into_iter().enumerate() {
            table.push(GlobalRow {
                date,
                country: country.to_string(),
                confirmed: c,
                recovered: r,
                death: d,
                confirmed_growth_rate: confirmed_growth[i],
                death_growth_rate: death_growth[i],
                first_infection_date: m.first_infection,
                days_from_first_infection: days_from(date, m.first_infection),
                tenth_infection_date: m.tenth_infection,
                days_from_tenth_infection: days_from(date, m.tenth_infection),
                first_death_date: m.first_death,
                days_from_first_death: days_from(date, m.first_death),
                tenth_death_date: m.tenth_death,
                days_from_tenth_death: days_from(date, m.tenth_death),
            });
        }
    }
    table
}

/// 抓取一个指标：下载、转长表、修正、汇总
pub fn fetch_metric(fetcher: &impl Fetch, config: &Config, metric: Metric) -> Result<Vec<DailyCount>> {
    let text = fetcher.fetch_text(&config.csv_url(metric.file()))?;
    let mut rows = reshape_wide(&text)?;
    apply_source_corrections(&mut rows, metric);
    let counts = aggregate_by_country(&rows);
    debug!(?metric, rows = rows.len(), counts = counts.len(), "metric loaded");
    Ok(counts)
}

/// 运行完整的全球时间序列流水线
pub fn fetch_global_table(fetcher: &impl Fetch, config: &Config) -> Result<Vec<GlobalRow>> {
    let confirmed = fetch_metric(fetcher, config, Metric::Confirmed)?;
    let recovered = fetch_metric(fetcher, config, Metric::Recovered)?;
    let deaths = fetch_metric(fetcher, config, Metric::Deaths)?;

    let table = build_global_table(&confirmed, &recovered, &deaths);
    info!(rows = table.len(), "global time series built");
    Ok(table)
}
