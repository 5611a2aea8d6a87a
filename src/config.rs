//! 运行配置：数据源地址、缓存目录、请求头

use std::path::{Path, PathBuf};

/// 卫生部日报索引页
pub const INDEX_URL: &str = "https://www.argentina.gob.ar/coronavirus/informe-diario";

/// JHU CSSE 时间序列根地址
pub const CSV_BASE_URL: &str =
    "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/";

pub const CONFIRMED_CSV: &str = "csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";
pub const RECOVERED_CSV: &str = "csse_covid_19_time_series/time_series_covid19_recovered_global.csv";
pub const DEATHS_CSV: &str = "csse_covid_19_time_series/time_series_covid19_deaths_global.csv";

/// 默认缓存目录
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// 浏览器 User-Agent，避免被简单的反爬拦截
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.149 Safari/537.36";

/// 与 User-Agent 一起发送的浏览器请求头
pub const BROWSER_HEADERS: [(&str, &str); 10] = [
    ("authority", "www.argentina.gob.ar"),
    ("cache-control", "max-age=0"),
    ("dnt", "1"),
    ("upgrade-insecure-requests", "1"),
    ("sec-fetch-dest", "document"),
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9",
    ),
    ("sec-fetch-site", "none"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-user", "?1"),
    ("accept-language", "en-US,en;q=0.9,es-AR;q=0.8,es;q=0.7"),
];

/// 运行配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub index_url: String,
    pub csv_base_url: String,
    pub cache_dir: PathBuf,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_url: INDEX_URL.to_string(),
            csv_base_url: CSV_BASE_URL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl Config {
    pub fn with_cache_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cache_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }

    pub fn with_csv_base(mut self, url: impl Into<String>) -> Self {
        self.csv_base_url = url.into();
        self
    }

    /// 拼接时间序列文件的完整地址
    pub fn csv_url(&self, file: &str) -> String {
        format!("{}{}", self.csv_base_url, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.index_url, INDEX_URL);
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_csv_url() {
        let config = Config::default().with_csv_base("http://localhost/");
        assert_eq!(
            config.csv_url(CONFIRMED_CSV),
            "http://localhost/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv"
        );
    }

    #[test]
    fn test_browser_headers() {
        assert!(BROWSER_HEADERS.contains(&("authority", "www.argentina.gob.ar")));
        assert!(BROWSER_HEADERS.iter().all(|(name, _)| *name == name.to_lowercase()));
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_cache_dir("/tmp/pdfs")
            .with_index_url("http://localhost/index");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/pdfs"));
        assert_eq!(config.index_url, "http://localhost/index");
    }
}
