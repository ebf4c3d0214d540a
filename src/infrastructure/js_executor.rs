//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"在当前上下文执行 JS"的能力

use chromiumoxide::cdp::browser_protocol::page::FrameId;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{Result, ScrapeError};

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 记录当前所在的 frame（None 表示顶层文档）
/// - 暴露 eval() 能力，不认识课程或评论
pub struct JsExecutor {
    page: Page,
    active_frame: Option<FrameId>,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self {
            page,
            active_frame: None,
        }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 切换执行上下文，None 表示回到顶层文档
    pub fn set_active_frame(&mut self, frame: Option<FrameId>) {
        debug!("切换执行上下文: {:?}", frame);
        self.active_frame = frame;
    }

    /// 在当前上下文执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let js_code = js_code.into();

        let result = match &self.active_frame {
            None => self.page.evaluate(js_code).await?,
            Some(frame_id) => {
                // 每次都重新取上下文：iframe 内部跳转后旧的上下文会失效
                let context_id = self
                    .page
                    .frame_execution_context(frame_id.clone())
                    .await?
                    .ok_or_else(|| {
                        ScrapeError::Browser(format!(
                            "iframe {} 的执行上下文尚未就绪",
                            frame_id.inner()
                        ))
                    })?;

                let params = EvaluateParams::builder()
                    .expression(js_code)
                    .context_id(context_id)
                    .return_by_value(true)
                    .await_promise(true)
                    .build()
                    .map_err(ScrapeError::Browser)?;
                self.page.evaluate_expression(params).await?
            }
        };

        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}
