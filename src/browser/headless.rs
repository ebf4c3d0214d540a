use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::dom::DescribeNodeParams;
use chromiumoxide::cdp::browser_protocol::page::FrameId;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::browser::driver::{FrameRef, PageDriver};
use crate::config::BrowserOptions;
use crate::error::{Result, ScrapeError};
use crate::infrastructure::JsExecutor;

/// 基于 chromiumoxide 的无头浏览器驱动
pub struct ChromeDriver {
    browser: Browser,
    handler: JoinHandle<()>,
    executor: JsExecutor,
}

impl ChromeDriver {
    /// 启动无头浏览器并打开一个空白页面
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        info!("🚀 启动无头浏览器...");

        let mut builder = BrowserConfig::builder();
        if options.headless {
            builder = builder.new_headless_mode();
        } else {
            builder = builder.with_head();
        }
        if let Some(path) = &options.chrome_executable {
            debug!("使用浏览器: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        let config = builder.args(options.args.clone()).build().map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            ScrapeError::Browser(format!("配置无头浏览器失败: {}", e))
        })?;

        let (mut browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            ScrapeError::Browser(format!("启动无头浏览器失败: {}", e))
        })?;
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 添加短暂延迟以等待浏览器状态同步
        sleep(tokio::time::Duration::from_millis(300)).await;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                error!("创建页面失败: {}", e);
                // 浏览器已经启动，失败时也要关掉
                if let Err(close_err) = browser.close().await {
                    warn!("关闭浏览器失败: {}", close_err);
                }
                handler.abort();
                return Err(ScrapeError::Browser(format!("创建页面失败: {}", e)));
            }
        };

        Ok(Self {
            browser,
            handler,
            executor: JsExecutor::new(page),
        })
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.executor.set_active_frame(None);
        self.executor.page().goto(url).await.map_err(|e| {
            error!("导航到 {} 失败: {}", url, e);
            ScrapeError::Browser(format!("导航到 {} 失败: {}", url, e))
        })?;
        info!("已导航到: {}", url);
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let js_code = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );
        self.executor.eval_as(js_code).await
    }

    async fn inner_text(&self, selector: &str) -> Result<Option<String>> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return el ? el.innerText : null;
            }})()
            "#,
            serde_json::to_string(selector)?
        );
        self.executor.eval_as(js_code).await
    }

    async fn child_frames(&self, selector: &str) -> Result<Vec<FrameRef>> {
        let page = self.executor.page();
        // 在顶层文档中查找，顺序即文档顺序
        let elements = page.find_elements(selector).await?;

        let mut frames = Vec::with_capacity(elements.len());
        for element in elements {
            let described = page
                .execute(DescribeNodeParams {
                    node_id: None,
                    backend_node_id: Some(element.backend_node_id.clone()),
                    object_id: None,
                    depth: None,
                    pierce: None,
                })
                .await?;

            let Some(frame_id) = described.result.node.frame_id.clone() else {
                debug!("iframe 元素尚未关联 frame，跳过");
                continue;
            };
            let url = element.attribute("src").await?.unwrap_or_default();
            frames.push(FrameRef {
                id: frame_id.inner().clone(),
                index: frames.len(),
                url,
            });
        }

        debug!("获取到 {} 个 iframe", frames.len());
        Ok(frames)
    }

    async fn enter_frame(&mut self, frame: &FrameRef) -> Result<()> {
        self.executor
            .set_active_frame(Some(FrameId::new(frame.id.clone())));
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.executor
            .eval_as("document.documentElement.outerHTML")
            .await
    }

    async fn shutdown(&mut self) -> Result<()> {
        debug!("正在关闭浏览器");
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!("等待浏览器进程退出失败: {}", e);
        }
        self.handler.abort();
        closed?;
        Ok(())
    }
}
