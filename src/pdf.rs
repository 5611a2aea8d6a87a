//! PDF 首页文本抽取

use crate::error::Result;
use lopdf::Document;
use std::path::Path;

/// 读取 PDF 第一页的文本；没有页面时返回空串
pub fn first_page_text(path: &Path) -> Result<String> {
    let doc = Document::load(path)?;
    page_text(&doc)
}

/// 同上，从内存读取
pub fn first_page_text_from_mem(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes)?;
    page_text(&doc)
}

fn page_text(doc: &Document) -> Result<String> {
    let Some(&first) = doc.get_pages().keys().next() else {
        return Ok(String::new());
    };
    Ok(doc.extract_text(&[first])?)
}
