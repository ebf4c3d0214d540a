use std::time::Duration;

use thiserror::Error;

/// 抓取流程错误类型
///
/// 前四类对应抓取管线本身的失败：页面未加载、评论 iframe 缺失、
/// 评论容器缺失、日期格式不符。其余为外围（浏览器、文件、配置）错误。
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 导航后在超时时间内未出现目标元素
    #[error("页面加载超时 ({url}): {timeout:?} 内未出现元素 '{selector}'")]
    NavigationTimeout {
        url: String,
        selector: String,
        timeout: Duration,
    },

    /// 嵌入的渲染上下文不足两个
    #[error("未找到评论 iframe: 页面仅有 {found} 个 iframe，至少需要 2 个")]
    FrameNotFound { found: usize },

    /// 期望的结构（评论列表、课程标题）缺失
    #[error("解析失败: {0}")]
    Parse(String),

    /// 日期字符串不符合 `Weekday, Month Day, Year Hour:Minute AM/PM`
    #[error("日期格式错误: '{input}' ({reason})")]
    DateFormat { input: String, reason: String },

    /// 单条评论缺少必需字段
    #[error("评论缺少字段: {field}")]
    MissingField { field: &'static str },

    /// 课程代码不合法
    #[error("课程代码不合法: '{0}'")]
    InvalidCourseCode(String),

    #[error("浏览器错误: {0}")]
    Browser(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::Browser(err.to_string())
    }
}

impl From<toml::de::Error> for ScrapeError {
    fn from(err: toml::de::Error) -> Self {
        ScrapeError::Config(err.to_string())
    }
}

/// 抓取结果类型
pub type Result<T> = std::result::Result<T, ScrapeError>;
