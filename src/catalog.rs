//! 省份目录数据加载

use crate::similarity::fold;

/// 内嵌的省份目录（编译时包含，顺序即匹配优先级）
const PROVINCE_DATA: &str = include_str!("../data/provinces.txt");

/// 布宜诺斯艾利斯自治市（快捷路径返回的写法）
pub const CITY_OF_BUENOS_AIRES: &str = "Ciudad autonoma de Buenos Aires";

/// 布宜诺斯艾利斯省
pub const PROVINCE_OF_BUENOS_AIRES: &str = "Provincia de Buenos Aires";

/// 加载省份目录，保持文件中的顺序
pub fn load_provinces() -> Vec<String> {
    PROVINCE_DATA
        .lines()
        .map(str::trim)
        // 跳过表头和空行
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// 目录条目：原始名称 + 预先归一化的比较键
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub key: String,
}

/// 省份目录
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// 从名称列表构建目录
    pub fn build(names: &[String]) -> Self {
        let entries = names
            .iter()
            .map(|name| CatalogEntry {
                name: name.clone(),
                key: fold(name),
            })
            .collect();
        Self { entries }
    }

    /// 内置的阿根廷省份目录
    pub fn argentina() -> Self {
        Self::build(&load_provinces())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
