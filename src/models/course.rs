use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};

/// 课程信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// 课程代码，由调用方提供
    pub code: String,
    /// 课程名称，取自页面标题
    pub name: String,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// 规范化用户输入的课程代码
    ///
    /// 只去掉首尾空白，大小写原样保留；只接受字母和数字，
    /// 因为代码会直接拼进 URL 和输出文件名。
    pub fn normalize_code(raw: &str) -> Result<String> {
        static CODE_RE: OnceLock<Regex> = OnceLock::new();
        let re = CODE_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+$").expect("static regex"));

        let code = raw.trim();
        if re.is_match(code) {
            Ok(code.to_string())
        } else {
            Err(ScrapeError::InvalidCourseCode(code.to_string()))
        }
    }

    /// 从课程页标题的文本中取课程名称
    ///
    /// 标题是两行文本：第一行为课程代码，第二行为课程名称。
    pub fn name_from_heading(heading_text: &str) -> Result<String> {
        let name = heading_text
            .lines()
            .nth(1)
            .map(str::trim)
            .unwrap_or_default();

        if name.is_empty() {
            return Err(ScrapeError::Parse(format!(
                "课程标题中没有课程名称: {:?}",
                heading_text
            )));
        }
        Ok(name.to_string())
    }
}
