//! 省份推断核心实现

use crate::catalog::{Catalog, CITY_OF_BUENOS_AIRES, PROVINCE_OF_BUENOS_AIRES};
use crate::record::ProvinceMatch;
use crate::similarity::{fold, similarity};
use once_cell::sync::Lazy;
use tracing::debug;

/// 全局推断器实例
static GLOBAL_INFERRER: Lazy<ProvinceInferrer> = Lazy::new(ProvinceInferrer::new);

/// 触发布宜诺斯艾利斯快捷路径的紧凑写法
const BUENOS_AIRES_MARKERS: [&str; 2] = ["buenosaires", "bsas"];

/// 省份推断器
///
/// 把自由文本地名映射到固定的省份目录上，返回最相似的条目和得分。
pub struct ProvinceInferrer {
    catalog: Catalog,
}

impl ProvinceInferrer {
    /// 使用内置阿根廷省份目录创建推断器
    pub fn new() -> Self {
        Self::with_catalog(Catalog::argentina())
    }

    /// 使用自定义目录创建推断器
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// 获取全局推断器实例
    pub fn global() -> &'static ProvinceInferrer {
        &GLOBAL_INFERRER
    }

    /// 推断文本对应的省份
    ///
    /// # 参数
    /// * `text` - 候选地名，大小写和重音任意
    ///
    /// # 返回
    /// 省份名称和置信度。同分时取目录中靠前的条目。
    ///
    /// # 示例
    /// ```rust
    /// use arcovid::ProvinceInferrer;
    ///
    /// let inferrer = ProvinceInferrer::new();
    /// let m = inferrer.infer("NEUQUEN");
    /// assert_eq!(m.province, "Neuquén");
    /// assert_eq!(m.score, 1.0);
    /// ```
    pub fn infer(&self, text: &str) -> ProvinceMatch {
        let folded = fold(text);

        // 第一步：布宜诺斯艾利斯快捷路径，不参与打分
        if let Some(m) = Self::buenos_aires_shortcut(&folded) {
            debug!(text, province = %m.province, "buenos aires shortcut");
            return m;
        }

        // 第二步：逐个目录条目打分，严格大于才替换，保证先出现者胜出
        let mut best: Option<(&str, f64)> = None;
        for entry in self.catalog.entries() {
            let score = similarity(&folded, &entry.key);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((entry.name.as_str(), score)),
            }
        }

        let Some((name, score)) = best else {
            return ProvinceMatch::default();
        };

        // 第三步：裸写的 "Buenos Aires" 统一为省
        let name = if name == "Buenos Aires" {
            PROVINCE_OF_BUENOS_AIRES
        } else {
            name
        };

        ProvinceMatch::new(name, score)
    }

    fn buenos_aires_shortcut(folded: &str) -> Option<ProvinceMatch> {
        let compact: String = folded.chars().filter(|c| c.is_alphanumeric()).collect();
        if !BUENOS_AIRES_MARKERS.iter().any(|m| compact.contains(m)) {
            return None;
        }

        let name = if folded.contains("ciudad") {
            CITY_OF_BUENOS_AIRES
        } else {
            PROVINCE_OF_BUENOS_AIRES
        };
        Some(ProvinceMatch::new(name, 1.0))
    }

    /// 批量推断
    pub fn infer_batch(&self, texts: &[&str]) -> Vec<ProvinceMatch> {
        texts.iter().map(|t| self.infer(t)).collect()
    }

    /// 获取目录中的所有省份
    pub fn provinces(&self) -> Vec<&str> {
        self.catalog.names().collect()
    }
}

impl Default for ProvinceInferrer {
    fn default() -> Self {
        Self::new()
    }
}
