use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScrapeError};

/// 默认配置文件名（存在时自动加载）
const DEFAULT_CONFIG_FILE: &str = "scraper.toml";

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 课程页面基础地址
    pub base_url: String,
    /// 评论区锚点
    pub reviews_anchor: String,
    /// CSV 输出目录
    pub output_dir: PathBuf,
    /// 结束时在终端预览的行数
    pub preview_rows: usize,
    /// 等待课程标题出现的超时（毫秒）
    pub navigation_timeout_ms: u64,
    /// 等待 iframe 出现的超时（毫秒）
    pub frame_timeout_ms: u64,
    /// 切换 iframe 后等待评论列表出现的超时（毫秒）
    pub content_timeout_ms: u64,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 评论列表出现后的额外等待（毫秒），默认不等待
    pub settle_delay_ms: u64,
    /// 严格模式：任意一条评论解析失败即终止
    pub strict_extraction: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    pub browser: BrowserOptions,
    pub selectors: Selectors,
}

/// 浏览器启动参数
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    pub headless: bool,
    /// 为空时由 chromiumoxide 自动查找本机 Chrome
    pub chrome_executable: Option<PathBuf>,
    pub args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            args: vec![
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                // 让跨域 iframe 留在同一进程，否则无法拿到其执行上下文
                "--disable-site-isolation-trials".to_string(),
                "--disable-features=IsolateOrigins,site-per-process".to_string(),
            ],
        }
    }
}

/// 页面结构选择器（外部页面约定，页面改版时在此调整）
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub heading: String,
    pub frame: String,
    pub post_list: String,
    pub author: String,
    pub time_ago: String,
    pub post_message: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            heading: "h1".to_string(),
            frame: "iframe".to_string(),
            post_list: "ul.post-list".to_string(),
            author: "span.author".to_string(),
            time_ago: "a.time-ago".to_string(),
            post_message: "div.post-message".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://nusmods.com/courses/".to_string(),
            reviews_anchor: "#reviews".to_string(),
            output_dir: PathBuf::from("data"),
            preview_rows: 5,
            navigation_timeout_ms: 10_000,
            frame_timeout_ms: 10_000,
            content_timeout_ms: 10_000,
            poll_interval_ms: 250,
            settle_delay_ms: 0,
            strict_extraction: false,
            verbose_logging: false,
            browser: BrowserOptions::default(),
            selectors: Selectors::default(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选） → 环境变量
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("SCRAPER_CONFIG").ok().map(PathBuf::from);
        let base = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("📄 读取配置文件: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Self {
        fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|v| v.parse().ok())
        }

        let mut config = self;
        if let Ok(v) = std::env::var("NUSMODS_BASE_URL") {
            config.base_url = v;
        }
        if let Ok(v) = std::env::var("OUTPUT_DIR") {
            config.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CHROME_EXECUTABLE") {
            config.browser.chrome_executable = Some(PathBuf::from(v));
        }
        config.navigation_timeout_ms =
            parsed("NAVIGATION_TIMEOUT_MS").unwrap_or(config.navigation_timeout_ms);
        config.frame_timeout_ms = parsed("FRAME_TIMEOUT_MS").unwrap_or(config.frame_timeout_ms);
        config.content_timeout_ms =
            parsed("CONTENT_TIMEOUT_MS").unwrap_or(config.content_timeout_ms);
        config.strict_extraction =
            parsed("STRICT_EXTRACTION").unwrap_or(config.strict_extraction);
        config.verbose_logging = parsed("VERBOSE_LOGGING").unwrap_or(config.verbose_logging);
        config.browser.headless = parsed("HEADLESS").unwrap_or(config.browser.headless);
        debug!("配置: {:?}", config);
        config
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(ScrapeError::Config("poll_interval_ms 必须大于 0".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(ScrapeError::Config("base_url 不能为空".to_string()));
        }
        Ok(())
    }

    /// 课程评论页地址，如 `https://nusmods.com/courses/CS1010#reviews`
    pub fn course_url(&self, course_code: &str) -> String {
        format!("{}{}{}", self.base_url, course_code, self.reviews_anchor)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_millis(self.content_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
