//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! course_scraper (一门课程)
//!     ↓
//! services (能力层：frame_resolver / review_extractor / csv_exporter)
//!     ↓
//! infrastructure (基础设施：RenderSession / JsExecutor)
//!     ↓
//! browser (PageDriver / ChromeDriver)
//! ```
//!
//! 只有编排层决定会话何时关闭。

pub mod course_scraper;

pub use course_scraper::{CourseScraper, ScrapeOutcome};
