//! iframe 选择服务 - 业务能力层
//!
//! 课程页上有多个 iframe：第一个是广告，第二个才是评论组件。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::{FrameRef, PageDriver};
use crate::config::Config;
use crate::error::{Result, ScrapeError};
use crate::infrastructure::RenderSession;

/// 评论组件所在 iframe 的位置
const TARGET_FRAME_INDEX: usize = 1;

/// iframe 选择服务
pub struct FrameResolver {
    frame_timeout: Duration,
    content_timeout: Duration,
    settle_delay: Duration,
    frame_selector: String,
    post_list_selector: String,
}

impl FrameResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            frame_timeout: config.frame_timeout(),
            content_timeout: config.content_timeout(),
            settle_delay: config.settle_delay(),
            frame_selector: config.selectors.frame.clone(),
            post_list_selector: config.selectors.post_list.clone(),
        }
    }

    /// 从按文档顺序排列的 iframe 中选出评论组件
    ///
    /// 只取第二个，忽略第一个及第二个之后的所有 iframe。
    pub fn select_target(frames: &[FrameRef]) -> Result<&FrameRef> {
        frames
            .get(TARGET_FRAME_INDEX)
            .ok_or(ScrapeError::FrameNotFound {
                found: frames.len(),
            })
    }

    /// 切换到评论 iframe 并等待评论列表出现
    pub async fn resolve<D: PageDriver>(&self, session: &mut RenderSession<D>) -> Result<FrameRef> {
        info!("🔍 查找评论 iframe...");

        let frames = session
            .wait_for_frames(&self.frame_selector, self.frame_timeout)
            .await?;
        for frame in &frames {
            debug!("iframe #{}: {}", frame.index, frame.url);
        }

        let target = Self::select_target(&frames)?.clone();
        session.enter_frame(&target).await?;
        info!("✓ 已切换到评论 iframe: {}", target.url);

        let ready = session
            .wait_for(&self.post_list_selector, self.content_timeout)
            .await?;
        if ready {
            debug!("评论列表已出现");
        } else {
            warn!(
                "⚠️ {:?} 内评论列表 '{}' 未出现",
                self.content_timeout, self.post_list_selector
            );
        }

        if !self.settle_delay.is_zero() {
            sleep(self.settle_delay).await;
        }

        Ok(target)
    }
}
