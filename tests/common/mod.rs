//! 测试用浏览器替身：用固定的 HTML 代替真实页面

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nusmods_review_scraper::{Config, FrameRef, PageDriver, Result, ScrapeError};
use scraper::{Html, Selector};

pub const COURSE_PAGE: &str = include_str!("../fixtures/course_page.html");
pub const AD_FRAME: &str = include_str!("../fixtures/ad_frame.html");
pub const DISQUS_THREAD: &str = include_str!("../fixtures/disqus_thread.html");

/// 记录替身被如何调用
#[derive(Debug, Default)]
pub struct Calls {
    pub visited: Mutex<Vec<String>>,
    pub entered: Mutex<Vec<String>>,
    pub shutdowns: AtomicUsize,
}

impl Calls {
    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn entered(&self) -> Vec<String> {
        self.entered.lock().unwrap().clone()
    }
}

/// 基于固定 HTML 的驱动
pub struct FakeDriver {
    top: String,
    frames: Vec<(FrameRef, String)>,
    active: Option<usize>,
    /// child_frames 前几次调用返回空列表，模拟 iframe 延迟出现
    frames_hidden_polls: AtomicUsize,
    calls: Arc<Calls>,
}

impl FakeDriver {
    pub fn new(top: &str) -> Self {
        Self {
            top: top.to_string(),
            frames: Vec::new(),
            active: None,
            frames_hidden_polls: AtomicUsize::new(0),
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn with_frame(mut self, url: &str, html: &str) -> Self {
        let index = self.frames.len();
        let frame = FrameRef {
            id: format!("frame-{}", index),
            index,
            url: url.to_string(),
        };
        self.frames.push((frame, html.to_string()));
        self
    }

    pub fn with_frames_hidden_for(self, polls: usize) -> Self {
        self.frames_hidden_polls.store(polls, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }

    fn active_html(&self) -> &str {
        match self.active {
            Some(i) => &self.frames[i].1,
            None => &self.top,
        }
    }

    fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| ScrapeError::Browser(e.to_string()))
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.calls.visited.lock().unwrap().push(url.to_string());
        self.active = None;
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let selector = Self::selector(selector)?;
        Ok(Html::parse_document(self.active_html()).select(&selector).count())
    }

    async fn inner_text(&self, selector: &str) -> Result<Option<String>> {
        let selector = Self::selector(selector)?;
        let document = Html::parse_document(self.active_html());
        // 每个文本节点一行，近似浏览器中块级元素的 innerText
        Ok(document.select(&selector).next().map(|el| {
            el.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        }))
    }

    async fn child_frames(&self, selector: &str) -> Result<Vec<FrameRef>> {
        let hidden = self.frames_hidden_polls.load(Ordering::SeqCst);
        if hidden > 0 {
            self.frames_hidden_polls.store(hidden - 1, Ordering::SeqCst);
            return Ok(Vec::new());
        }

        // 按顶层文档中 iframe 元素的顺序，用 src 对应到注册的 frame；
        // 注册顺序相当于浏览器挂载 frame 的顺序，可以与文档顺序不同
        let selector = Self::selector(selector)?;
        let document = Html::parse_document(&self.top);
        let mut frames = Vec::new();
        for element in document.select(&selector) {
            let src = element.value().attr("src").unwrap_or_default();
            let attached = self
                .frames
                .iter()
                .find(|(f, _)| f.url == src && !frames.iter().any(|r: &FrameRef| r.id == f.id));
            if let Some((frame, _)) = attached {
                frames.push(FrameRef {
                    id: frame.id.clone(),
                    index: frames.len(),
                    url: frame.url.clone(),
                });
            }
        }
        Ok(frames)
    }

    async fn enter_frame(&mut self, frame: &FrameRef) -> Result<()> {
        let index = self
            .frames
            .iter()
            .position(|(f, _)| f.id == frame.id)
            .ok_or_else(|| ScrapeError::Browser(format!("unknown frame {}", frame.id)))?;
        self.calls.entered.lock().unwrap().push(frame.id.clone());
        self.active = Some(index);
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.active_html().to_string())
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.calls.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub const AD_URL: &str = "https://ads.example.com/slot";
pub const DISQUS_URL: &str = "https://disqus.com/embed/comments/?t_i=CS1010";

/// 课程页 + 广告 iframe + 评论 iframe
pub fn course_page_driver() -> FakeDriver {
    FakeDriver::new(COURSE_PAGE)
        .with_frame(AD_URL, AD_FRAME)
        .with_frame(DISQUS_URL, DISQUS_THREAD)
}

/// 带两行标题、按给定顺序排列 iframe 的课程页
pub fn page_with_frames(srcs: &[&str]) -> String {
    let iframes = srcs
        .iter()
        .map(|src| format!(r#"<div class="slot"><iframe src="{}"></iframe></div>"#, src))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<html><body><h1><span>CS1010</span><span>Programming Methodology</span></h1>{}</body></html>"#,
        iframes
    )
}

/// 超时都很短的测试配置
pub fn fast_config(output_dir: &std::path::Path) -> Config {
    Config {
        output_dir: output_dir.to_path_buf(),
        navigation_timeout_ms: 100,
        frame_timeout_ms: 100,
        content_timeout_ms: 100,
        poll_interval_ms: 5,
        ..Config::default()
    }
}

pub fn poll() -> Duration {
    Duration::from_millis(5)
}
