//! 日报 PDF 本地缓存
//!
//! 一个 URL 对应目录中的一个文件，文件名取 URL 最后一段。
//! 先检查是否存在，不存在才下载写入；没有过期时间，也没有加锁，
//! 损坏的缓存文件会一直被复用，直到手动删除。

use crate::error::Result;
use crate::fetch::Fetch;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 缓存目录句柄
#[derive(Debug, Clone)]
pub struct PdfCache {
    dir: PathBuf,
}

impl PdfCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// URL 对应的缓存文件路径
    pub fn path_for(&self, url: &str) -> PathBuf {
        let name = url.rsplit('/').next().unwrap_or(url);
        // 以 "/" 结尾的链接没有文件名
        let name = if name.is_empty() { "index" } else { name };
        self.dir.join(name)
    }

    /// 是否已缓存
    pub fn contains(&self, url: &str) -> bool {
        self.path_for(url).exists()
    }

    /// 返回缓存文件路径，未缓存时先下载
    pub fn fetch(&self, fetcher: &impl Fetch, url: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(url);
        if path.exists() {
            debug!(path = %path.display(), "cache hit");
            return Ok(path);
        }

        let bytes = fetcher.fetch(url)?;
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), "cached");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// 记录调用次数的假抓取器
    struct CountingFetcher {
        calls: Cell<usize>,
    }

    impl Fetch for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            Ok(b"%PDF-1.5 fake".to_vec())
        }
    }

    #[test]
    fn test_path_for() {
        let cache = PdfCache::new("cache");
        assert_eq!(cache.dir(), Path::new("cache"));
        assert_eq!(
            cache.path_for("https://host/files/03-04-20-diario.pdf"),
            PathBuf::from("cache/03-04-20-diario.pdf")
        );
        assert_eq!(cache.path_for("https://host/files/"), PathBuf::from("cache/index"));
    }

    #[test]
    fn test_fetch_downloads_once() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = PdfCache::new(tmp.path().join("cache"));
        let fetcher = CountingFetcher { calls: Cell::new(0) };
        let url = "https://host/files/03-04-20-diario.pdf";

        assert!(!cache.contains(url));
        let first = cache.fetch(&fetcher, url).unwrap();
        let second = cache.fetch(&fetcher, url).unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls.get(), 1);
        assert!(cache.contains(url));
        assert_eq!(fs::read(&first).unwrap(), b"%PDF-1.5 fake");
    }

    #[test]
    fn test_existing_file_reused() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = PdfCache::new(tmp.path());
        let url = "https://host/files/stale.pdf";
        fs::write(tmp.path().join("stale.pdf"), b"corrupt").unwrap();

        let fetcher = CountingFetcher { calls: Cell::new(0) };
        let path = cache.fetch(&fetcher, url).unwrap();

        // 损坏的文件也会被复用
        assert_eq!(fetcher.calls.get(), 0);
        assert_eq!(fs::read(path).unwrap(), b"corrupt");
    }
}
