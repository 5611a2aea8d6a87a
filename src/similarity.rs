//! 字符多重集重叠相似度
//!
//! 不是编辑距离：只比较两个字符串共享的字符数量，与字符顺序无关。
//! PDF 抽取出的文本常有丢失空格、重音符号错位等噪声，这种度量对此更宽容。

use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 去掉重音符号，保留大小写（`Córdoba` -> `Cordoba`）
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// 归一化：小写并去掉重音符号（`Córdoba` -> `cordoba`）
pub fn fold(text: &str) -> String {
    strip_accents(text).to_lowercase()
}

/// 字符 -> 出现次数
fn char_counts(s: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for ch in s.chars() {
        *counts.entry(ch).or_insert(0) += 1;
    }
    counts
}

/// 计算 `query` 与 `target` 的重叠相似度，结果在 `[0, 1]`
///
/// 对 `query` 中每个字符累加 `min(query_count, target_count)`，
/// 再除以两者中较长的字符数。调用方负责事先归一化大小写。
/// 两个空串返回 `0.0`。
///
/// ```rust
/// use arcovid::similarity;
///
/// assert_eq!(similarity("salta", "salta"), 1.0);
/// assert_eq!(similarity("", ""), 0.0);
/// ```
pub fn similarity(query: &str, target: &str) -> f64 {
    let longest = query.chars().count().max(target.chars().count());
    if longest == 0 {
        return 0.0;
    }

    let query_counts = char_counts(query);
    let target_counts = char_counts(target);

    let shared: usize = query_counts
        .iter()
        .map(|(ch, &cnt)| cnt.min(target_counts.get(ch).copied().unwrap_or(0)))
        .sum();

    shared as f64 / longest as f64
}
