//! CSV 导出服务 - 业务能力层
//!
//! 只负责"写 CSV / 读回 CSV"能力，不关心流程

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{ReviewRow, ReviewSet};

/// CSV 导出服务
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 输出文件路径：`<目录>/<课程代码> Reviews <YYYY-MM-DD>.csv`
    pub fn file_path(&self, course_code: &str, run_date: NaiveDate) -> PathBuf {
        self.output_dir.join(format!(
            "{} Reviews {}.csv",
            course_code,
            run_date.format("%Y-%m-%d")
        ))
    }

    /// 写出评价表格，返回文件路径
    pub fn export(&self, reviews: &ReviewSet, run_date: NaiveDate) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.file_path(&reviews.course.code, run_date);
        let rows = reviews.rows();
        debug!("写入 {} 行到 {}", rows.len(), path.display());

        let mut writer = csv::Writer::from_path(&path)?;
        if rows.is_empty() {
            // 没有评价时也保留表头
            writer.write_record(["Course Code", "Course Name", "Date", "Author", "Content"])?;
        }
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!("💾 已导出 {} 条评价: {}", rows.len(), path.display());
        Ok(path)
    }

    /// 读回导出的 CSV
    pub fn read_rows(path: &Path) -> Result<Vec<ReviewRow>> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader
            .deserialize::<ReviewRow>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
