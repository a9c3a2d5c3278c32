//! 应用配置
//!
//! 后端地址在编译期通过 `PLANTDOC_API_URL` 环境变量注入，未设置时使用默认部署。

use std::sync::LazyLock;

const DEFAULT_API_URL: &str = "https://agriback-mj37.onrender.com";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端根地址（不含末尾斜杠）
    pub api_base_url: String,
    /// 报告没有图片时使用的占位图
    pub placeholder_image: String,
}

impl AppConfig {
    pub fn new(api_base_url: Option<&str>) -> Self {
        let base = api_base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL);

        Self {
            api_base_url: base.trim_end_matches('/').to_string(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

pub static CONFIG: LazyLock<AppConfig> =
    LazyLock::new(|| AppConfig::new(option_env!("PLANTDOC_API_URL")));
