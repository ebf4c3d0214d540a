//! 渲染会话 - 基础设施层
//!
//! 一次抓取对应一个会话，会话独占一个浏览器进程。

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::browser::{FrameRef, PageDriver};
use crate::error::{Result, ScrapeError};

/// 渲染会话
///
/// 职责：
/// - 持有浏览器驱动
/// - 导航并等待元素出现
/// - 记录当前所在的 iframe
///
/// `close` 消耗会话本身，所以同一个会话不会被关闭两次。
pub struct RenderSession<D: PageDriver> {
    driver: D,
    poll_interval: Duration,
    active_frame: Option<FrameRef>,
}

impl<D: PageDriver> RenderSession<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
            active_frame: None,
        }
    }

    /// 导航到 `url`，直到 `selector` 对应的元素出现
    ///
    /// 超时仍未出现时返回 `NavigationTimeout`。
    pub async fn open(&mut self, url: &str, selector: &str, timeout: Duration) -> Result<()> {
        info!("🌐 打开页面: {}", url);
        self.driver.goto(url).await?;
        self.active_frame = None;

        if self.wait_for(selector, timeout).await? {
            debug!("页面就绪，已找到 '{}'", selector);
            Ok(())
        } else {
            Err(ScrapeError::NavigationTimeout {
                url: url.to_string(),
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    /// 在当前上下文中轮询，直到出现匹配 `selector` 的元素
    ///
    /// 返回是否在超时前出现。轮询期间的驱动错误视为"尚未就绪"。
    pub async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.driver.count(selector).await {
                Ok(n) if n > 0 => return Ok(true),
                Ok(_) => {}
                Err(e) => debug!("查询 '{}' 失败，稍后重试: {}", selector, e),
            }

            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(self.poll_interval).await;
        }
    }

    /// 在超时前等到至少一个匹配 `selector` 的 iframe，返回所有匹配的 iframe
    pub async fn wait_for_frames(&self, selector: &str, timeout: Duration) -> Result<Vec<FrameRef>> {
        let deadline = Instant::now() + timeout;
        loop {
            let frames = self.driver.child_frames(selector).await?;
            if !frames.is_empty() || Instant::now() >= deadline {
                return Ok(frames);
            }
            sleep(self.poll_interval).await;
        }
    }

    pub async fn inner_text(&self, selector: &str) -> Result<Option<String>> {
        self.driver.inner_text(selector).await
    }

    /// 切换到指定 iframe，之后的查询都在该 iframe 内执行
    pub async fn enter_frame(&mut self, frame: &FrameRef) -> Result<()> {
        self.driver.enter_frame(frame).await?;
        self.active_frame = Some(frame.clone());
        Ok(())
    }

    pub fn active_frame(&self) -> Option<&FrameRef> {
        self.active_frame.as_ref()
    }

    /// 当前上下文的 HTML 快照
    pub async fn snapshot(&self) -> Result<String> {
        self.driver.content().await
    }

    /// 释放浏览器进程
    pub async fn close(mut self) -> Result<()> {
        info!("🔒 关闭浏览器会话");
        self.driver.shutdown().await.map_err(|e| {
            warn!("关闭浏览器失败: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// 前 `appear_after` 次查询返回 0，之后返回 1
    struct SlowPage {
        appear_after: usize,
        polls: std::sync::atomic::AtomicUsize,
        shut_down: bool,
    }

    impl SlowPage {
        fn new(appear_after: usize) -> Self {
            Self {
                appear_after,
                polls: Default::default(),
                shut_down: false,
            }
        }
    }

    #[async_trait]
    impl PageDriver for SlowPage {
        async fn goto(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        async fn count(&self, _selector: &str) -> Result<usize> {
            let n = self.polls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n == 0 {
                return Err(ScrapeError::Browser("context not ready".to_string()));
            }
            Ok(usize::from(n >= self.appear_after))
        }

        async fn inner_text(&self, _selector: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn child_frames(&self, _selector: &str) -> Result<Vec<FrameRef>> {
            Ok(Vec::new())
        }

        async fn enter_frame(&mut self, _frame: &FrameRef) -> Result<()> {
            Ok(())
        }

        async fn content(&self) -> Result<String> {
            Ok(String::new())
        }

        async fn shutdown(&mut self) -> Result<()> {
            assert!(!self.shut_down, "shutdown called twice");
            self.shut_down = true;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_open_waits_until_element_appears() {
        let mut session = RenderSession::new(SlowPage::new(3), Duration::from_millis(1));
        session
            .open("https://example.com", "h1", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(session.active_frame().is_none());
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_times_out() {
        let mut session = RenderSession::new(SlowPage::new(usize::MAX), Duration::from_millis(1));
        let err = session
            .open("https://example.com", "h1", Duration::from_millis(20))
            .await
            .unwrap_err();

        match err {
            ScrapeError::NavigationTimeout { url, selector, timeout } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(selector, "h1");
                assert_eq!(timeout, Duration::from_millis(20));
            }
            other => panic!("expected NavigationTimeout, got {:?}", other),
        }
    }

    #[test]
    fn test_enter_frame_tracks_active_frame() {
        tokio_test::block_on(async {
            let mut session = RenderSession::new(SlowPage::new(1), Duration::from_millis(1));
            let frame = FrameRef {
                id: "f1".to_string(),
                index: 1,
                url: "https://disqus.com/embed".to_string(),
            };
            session.enter_frame(&frame).await.unwrap();
            assert_eq!(session.active_frame(), Some(&frame));
        });
    }
}
