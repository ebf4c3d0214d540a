//! 评论解析服务 - 业务能力层
//!
//! 只负责把评论组件的 HTML 转成评价列表，不关心浏览器和流程

use std::sync::OnceLock;

use chrono::{NaiveDateTime, Weekday};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::config::{Config, Selectors};
use crate::error::{Result, ScrapeError};
use crate::models::{Extraction, PostFailure, ReviewRecord};
use crate::utils::logging::truncate_text;

/// 评论时间的 title 格式，如 `Monday, January 1, 2024 10:30 AM`
pub const REVIEW_DATE_FORMAT: &str = "%A, %B %d, %Y %I:%M %p";

/// 去掉星期之后的部分
const DATE_AFTER_WEEKDAY_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// 单条评论解析失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractPolicy {
    /// 记录失败并继续
    Lenient,
    /// 第一条失败即终止
    Strict,
}

/// 解析评论时间
///
/// 格式为 [`REVIEW_DATE_FORMAT`]，连续空白（包括不间断空格）先合并为一个空格。
/// 星期必须是合法的英文名称，但不与日期核对：以日期本身为准。
pub fn parse_review_date(raw: &str) -> Result<NaiveDateTime> {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("static regex"));

    let date_error = |reason: String| ScrapeError::DateFormat {
        input: raw.to_string(),
        reason,
    };

    let normalized = spaces.replace_all(raw.trim(), " ");
    let (weekday, rest) = normalized
        .split_once(", ")
        .ok_or_else(|| date_error("缺少星期".to_string()))?;
    weekday
        .parse::<Weekday>()
        .map_err(|_| date_error(format!("无效的星期: {}", weekday)))?;

    NaiveDateTime::parse_from_str(rest, DATE_AFTER_WEEKDAY_FORMAT)
        .map_err(|e| date_error(e.to_string()))
}

/// 编译后的选择器
struct CompiledSelectors {
    post_list: Selector,
    author: Selector,
    time_ago: Selector,
    post_message: Selector,
}

impl CompiledSelectors {
    fn compile(selectors: &Selectors) -> Result<Self> {
        fn parse(css: &str) -> Result<Selector> {
            Selector::parse(css)
                .map_err(|e| ScrapeError::Config(format!("无效的选择器 '{}': {}", css, e)))
        }

        Ok(Self {
            post_list: parse(&selectors.post_list)?,
            author: parse(&selectors.author)?,
            time_ago: parse(&selectors.time_ago)?,
            post_message: parse(&selectors.post_message)?,
        })
    }
}

/// 评论解析服务
pub struct ReviewExtractor {
    selectors: CompiledSelectors,
    policy: ExtractPolicy,
}

impl ReviewExtractor {
    pub fn new(config: &Config) -> Result<Self> {
        let policy = if config.strict_extraction {
            ExtractPolicy::Strict
        } else {
            ExtractPolicy::Lenient
        };
        Self::with_selectors(&config.selectors, policy)
    }

    pub fn with_selectors(selectors: &Selectors, policy: ExtractPolicy) -> Result<Self> {
        Ok(Self {
            selectors: CompiledSelectors::compile(selectors)?,
            policy,
        })
    }

    /// 解析评论组件的 HTML
    ///
    /// 找不到评论列表时返回 `Parse` 错误；单条评论的问题按策略处理。
    pub fn extract(&self, html: &str) -> Result<Extraction> {
        info!("📝 解析评论...");
        let document = Html::parse_document(html);

        let post_list = document.select(&self.selectors.post_list).next().ok_or_else(|| {
            ScrapeError::Parse("页面中没有评论列表 (post list)".to_string())
        })?;

        let mut extraction = Extraction::default();
        for (index, post) in post_list.children().filter_map(ElementRef::wrap).enumerate() {
            match self.extract_post(post) {
                Ok(record) => {
                    debug!(
                        "评论 #{} | {} | {} | {}",
                        index,
                        record.date,
                        record.author,
                        truncate_text(&record.content, 40)
                    );
                    extraction.records.push(record);
                }
                Err(reason) if self.policy == ExtractPolicy::Strict => {
                    warn!("评论 #{} 解析失败: {}", index, reason);
                    return Err(reason);
                }
                Err(reason) => {
                    warn!("⚠️ 跳过评论 #{}: {}", index, reason);
                    extraction.failures.push(PostFailure {
                        index,
                        raw_markup: post.html(),
                        reason,
                    });
                }
            }
        }

        info!(
            "✓ 解析完成: 成功 {} 条, 跳过 {} 条",
            extraction.records.len(),
            extraction.failures.len()
        );
        Ok(extraction)
    }

    fn extract_post(&self, post: ElementRef<'_>) -> Result<ReviewRecord> {
        let author = post
            .select(&self.selectors.author)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .ok_or(ScrapeError::MissingField { field: "author" })?;

        let date_title = post
            .select(&self.selectors.time_ago)
            .next()
            .and_then(|anchor| anchor.value().attr("title"))
            .ok_or(ScrapeError::MissingField { field: "date" })?;
        let date = parse_review_date(date_title)?;

        let content = post
            .select(&self.selectors.post_message)
            .next()
            .map(element_text)
            .ok_or(ScrapeError::MissingField { field: "content" })?;

        Ok(ReviewRecord {
            date,
            author,
            content,
        })
    }
}

/// 元素内全部文本，去掉首尾空白
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
