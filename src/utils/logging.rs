//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时默认 info，`verbose` 为 true 时为 debug。
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "nusmods_review_scraper=debug,info"
    } else {
        "nusmods_review_scraper=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能被重复调用，忽略重复初始化
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `course_code`: 课程代码
/// - `url`: 课程评论页地址
pub fn log_startup(course_code: &str, url: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始抓取课程评价: {}", course_code);
    info!("🔗 {}", url);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `course_name`: 课程名称
/// - `exported`: 导出条数
/// - `skipped`: 跳过条数
/// - `output_path`: CSV 文件路径
pub fn log_summary(course_name: &str, exported: usize, skipped: usize, output_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 抓取完成: {}", course_name);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 导出: {}", exported);
    info!("❌ 跳过: {}", skipped);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_path.display());
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
