//! 浏览器驱动抽象
//!
//! 把流程需要的浏览器操作收敛成一个 trait：上层（会话、iframe 选择）
//! 只依赖这些能力，真实浏览器与测试替身各自实现。

use async_trait::async_trait;

use crate::error::Result;

/// 页面中的一个嵌入渲染上下文（iframe）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRef {
    /// 驱动内部的 frame 标识
    pub id: String,
    /// 文档顺序中的位置（从 0 开始）
    pub index: usize,
    pub url: String,
}

/// 浏览器驱动能力
///
/// 所有查询都作用于当前上下文：初始为顶层文档，
/// 调用 `enter_frame` 之后为对应的 iframe。
#[async_trait]
pub trait PageDriver: Send {
    /// 导航到指定地址，并回到顶层文档
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// 当前上下文中匹配选择器的元素数量
    async fn count(&self, selector: &str) -> Result<usize>;

    /// 当前上下文中第一个匹配元素的 innerText
    async fn inner_text(&self, selector: &str) -> Result<Option<String>>;

    /// 顶层文档中匹配 `selector` 的 iframe，按文档顺序排列
    ///
    /// 尚未关联到 frame 的元素不返回。
    async fn child_frames(&self, selector: &str) -> Result<Vec<FrameRef>>;

    /// 切换到指定 iframe
    async fn enter_frame(&mut self, frame: &FrameRef) -> Result<()>;

    /// 当前上下文的完整 HTML
    async fn content(&self) -> Result<String>;

    /// 关闭浏览器进程
    async fn shutdown(&mut self) -> Result<()>;
}
