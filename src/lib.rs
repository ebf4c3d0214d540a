//! # NUSMods Review Scraper
//!
//! 抓取 NUSMods 单门课程页面中嵌入的评论组件，导出为 CSV
//!
//! ## 架构设计
//!
//! ### ① 浏览器层（Browser）
//! - `browser/` - `PageDriver` 抽象浏览器能力，`ChromeDriver` 为 chromiumoxide 实现
//!
//! ### ② 基础设施层（Infrastructure）
//! - `JsExecutor` - 唯一的 page owner，在当前 frame 中执行 JS
//! - `RenderSession` - 一次抓取独占一个浏览器，负责导航与等待
//!
//! ### ③ 业务能力层（Services）
//! - `FrameResolver` - 找到评论 iframe 并切换进去
//! - `ReviewExtractor` - HTML → 评价列表
//! - `CsvExporter` - 写 CSV 能力
//!
//! ### ④ 编排层（Orchestration）
//! - `CourseScraper` - 串起整个流程，保证浏览器一定被关闭
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use browser::{ChromeDriver, FrameRef, PageDriver};
pub use config::Config;
pub use error::{Result, ScrapeError};
pub use infrastructure::{JsExecutor, RenderSession};
pub use models::{Course, Extraction, PostFailure, ReviewRecord, ReviewRow, ReviewSet};
pub use orchestrator::{CourseScraper, ScrapeOutcome};
pub use services::{parse_review_date, CsvExporter, ExtractPolicy, FrameResolver, ReviewExtractor};
