//! HTTP 抓取与日报链接发现

use crate::config::{Config, BROWSER_HEADERS};
use crate::error::Result;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("anchor selector is valid"));

/// 日报链接必须包含的关键词
const REPORT_MARKER: &str = "diario";

/// 分享按钮与早间版报告
const EXCLUDED_MARKERS: [&str; 4] = ["facebook", "linkedin", "whatsapp", "matutino"];

/// 抓取接口：测试中可替换为内存实现
pub trait Fetch {
    /// 获取原始字节
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// 获取文本（非法 UTF-8 字节会被替换）
    fn fetch_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch(url)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// 同步 HTTP 客户端，每个请求都带浏览器请求头
///
/// 无超时、无重试：失败直接返回错误。
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in BROWSER_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpClient {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET");
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

/// 从索引页 HTML 中找出日报链接，保持文档顺序
pub fn discover_report_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| is_report_link(href))
        .map(str::to_string)
        .collect()
}

fn is_report_link(href: &str) -> bool {
    href.contains(REPORT_MARKER) && !EXCLUDED_MARKERS.iter().any(|m| href.contains(m))
}

/// 相对链接按索引页地址补全；无法解析时原样返回
pub fn resolve_link(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// 抓取索引页并返回日报链接
pub fn fetch_report_links(fetcher: &impl Fetch, index_url: &str) -> Result<Vec<String>> {
    let html = fetcher.fetch_text(index_url)?;
    let links: Vec<String> = discover_report_links(&html)
        .iter()
        .map(|href| resolve_link(index_url, href))
        .collect();
    debug!(count = links.len(), "report links discovered");
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticPages(HashMap<String, String>);

    impl Fetch for StaticPages {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            Ok(self.0.get(url).cloned().unwrap_or_default().into_bytes())
        }
    }

    const INDEX: &str = r#"
        <html><body>
          <a href="https://www.facebook.com/sharer.php?u=informe-diario">Compartir</a>
          <a href="/sites/default/files/03-04-20-reporte-diario-vespertino.pdf">Vespertino</a>
          <a href="/sites/default/files/03-04-20-reporte-diario-matutino.pdf">Matutino</a>
          <a href="https://wa.me/?text=whatsapp-diario">WhatsApp</a>
          <a href="https://www.linkedin.com/share?diario">LinkedIn</a>
          <a href="/coronavirus/preguntas">Preguntas</a>
          <a>sin enlace</a>
          <a href="https://www.argentina.gob.ar/sites/default/files/02-04-20-reporte-diario.pdf">Ayer</a>
        </body></html>
    "#;

    #[test]
    fn test_discover_report_links() {
        assert_eq!(
            discover_report_links(INDEX),
            vec![
                "/sites/default/files/03-04-20-reporte-diario-vespertino.pdf".to_string(),
                "https://www.argentina.gob.ar/sites/default/files/02-04-20-reporte-diario.pdf"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_resolve_link() {
        let base = "https://www.argentina.gob.ar/coronavirus/informe-diario";
        assert_eq!(
            resolve_link(base, "/sites/default/files/a.pdf"),
            "https://www.argentina.gob.ar/sites/default/files/a.pdf"
        );
        assert_eq!(
            resolve_link(base, "https://other.org/b.pdf"),
            "https://other.org/b.pdf"
        );
        assert_eq!(resolve_link("not a url", "x.pdf"), "x.pdf");
    }

    #[test]
    fn test_fetch_report_links() {
        let index_url = "https://www.argentina.gob.ar/coronavirus/informe-diario";
        let pages = StaticPages(HashMap::from([(index_url.to_string(), INDEX.to_string())]));

        let links = fetch_report_links(&pages, index_url).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0],
            "https://www.argentina.gob.ar/sites/default/files/03-04-20-reporte-diario-vespertino.pdf"
        );
    }

    #[test]
    fn test_http_client_builds() {
        assert!(HttpClient::new(&Config::default()).is_ok());
    }
}
