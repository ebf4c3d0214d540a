//! 单门课程抓取器 - 编排层
//!
//! ## 职责
//!
//! 按顺序调度一次抓取：
//!
//! 1. **打开页面**：导航到课程评论页，等待标题出现
//! 2. **课程名称**：标题第二行
//! 3. **切换 iframe**：委托 `FrameResolver`
//! 4. **解析评论**：委托 `ReviewExtractor`
//! 5. **导出**：带上课程代码和名称写 CSV
//! 6. **释放浏览器**：无论成功失败都关闭会话

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::browser::{ChromeDriver, PageDriver};
use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::infrastructure::RenderSession;
use crate::models::{Course, PostFailure, ReviewSet};
use crate::services::{CsvExporter, FrameResolver, ReviewExtractor};
use crate::utils::logging::{log_startup, log_summary};

/// 一次抓取的结果
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub reviews: ReviewSet,
    /// 被跳过的评论
    pub failures: Vec<PostFailure>,
    pub output_path: PathBuf,
}

/// 单门课程抓取器
///
/// 不持有浏览器；会话由调用方创建并交给 `run`，`run` 负责关闭。
pub struct CourseScraper {
    config: Config,
    frame_resolver: FrameResolver,
    extractor: ReviewExtractor,
    exporter: CsvExporter,
}

impl CourseScraper {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            frame_resolver: FrameResolver::new(&config),
            extractor: ReviewExtractor::new(&config)?,
            exporter: CsvExporter::new(config.output_dir.clone()),
            config,
        })
    }

    /// 启动无头浏览器并抓取一门课程
    pub async fn scrape_course(&self, raw_code: &str, run_date: NaiveDate) -> Result<ScrapeOutcome> {
        let course_code = Course::normalize_code(raw_code)?;
        let driver = ChromeDriver::launch(&self.config.browser).await?;
        let session = RenderSession::new(driver, self.config.poll_interval());
        self.run(session, &course_code, run_date).await
    }

    /// 在给定会话上执行完整流程，结束后关闭会话
    pub async fn run<D: PageDriver>(
        &self,
        mut session: RenderSession<D>,
        course_code: &str,
        run_date: NaiveDate,
    ) -> Result<ScrapeOutcome> {
        let result = self.scrape(&mut session, course_code, run_date).await;

        if let Err(e) = &result {
            error!("❌ 抓取 {} 失败: {}", course_code, e);
        }
        if let Err(e) = session.close().await {
            warn!("⚠️ 浏览器未能正常关闭: {}", e);
        }

        result
    }

    async fn scrape<D: PageDriver>(
        &self,
        session: &mut RenderSession<D>,
        course_code: &str,
        run_date: NaiveDate,
    ) -> Result<ScrapeOutcome> {
        let url = self.config.course_url(course_code);
        log_startup(course_code, &url);

        // ========== 打开页面并读取课程名称 ==========
        let heading = &self.config.selectors.heading;
        session
            .open(&url, heading, self.config.navigation_timeout())
            .await?;

        let heading_text = session.inner_text(heading).await?.ok_or_else(|| {
            ScrapeError::Parse(format!("页面中没有课程标题 '{}'", heading))
        })?;
        let course = Course::new(course_code, Course::name_from_heading(&heading_text)?);
        info!("📚 课程: {} {}", course.code, course.name);

        // ========== 切换到评论 iframe 并解析 ==========
        self.frame_resolver.resolve(session).await?;
        let html = session.snapshot().await?;
        let extraction = self.extractor.extract(&html)?;

        // ========== 导出 ==========
        let reviews = ReviewSet::new(course, extraction.records);
        let output_path = self.exporter.export(&reviews, run_date)?;

        log_summary(
            &reviews.course.name,
            reviews.len(),
            extraction.failures.len(),
            &output_path,
        );

        Ok(ScrapeOutcome {
            reviews,
            failures: extraction.failures,
            output_path,
        })
    }
}
