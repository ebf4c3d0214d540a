use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::models::course::Course;

/// CSV 中日期的文本格式
pub const CSV_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 单条课程评价
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub date: NaiveDateTime,
    pub author: String,
    /// 可以为空字符串，但对应元素必须存在
    pub content: String,
}

/// 解析失败的单条评论
#[derive(Debug)]
pub struct PostFailure {
    /// 在评论列表中的位置（从 0 开始）
    pub index: usize,
    /// 原始 HTML，便于排查
    pub raw_markup: String,
    pub reason: ScrapeError,
}

/// 一次解析的结果：成功的评价 + 失败的评论
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<ReviewRecord>,
    pub failures: Vec<PostFailure>,
}

impl Extraction {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 某门课程的全部评价，顺序与页面一致
#[derive(Debug, Clone)]
pub struct ReviewSet {
    pub course: Course,
    pub records: Vec<ReviewRecord>,
}

impl ReviewSet {
    pub fn new(course: Course, records: Vec<ReviewRecord>) -> Self {
        Self { course, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 展开为导出行，每行带上课程代码和名称
    pub fn rows(&self) -> Vec<ReviewRow> {
        self.records
            .iter()
            .map(|record| ReviewRow {
                course_code: self.course.code.clone(),
                course_name: self.course.name.clone(),
                date: record.date.format(CSV_DATE_FORMAT).to_string(),
                author: record.author.clone(),
                content: record.content.clone(),
            })
            .collect()
    }
}

/// 导出表格中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRow {
    #[serde(rename = "Course Code")]
    pub course_code: String,
    #[serde(rename = "Course Name")]
    pub course_name: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "Content")]
    pub content: String,
}

impl ReviewRow {
    /// 把文本日期还原为时间
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, CSV_DATE_FORMAT).ok()
    }
}
