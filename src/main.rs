use std::io::{self, BufRead};

use anyhow::{Context, Result};
use nusmods_review_scraper::utils::{logging, preview};
use nusmods_review_scraper::{Config, CourseScraper};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 从标准输入读取课程代码（第一行非空内容）
    let course_code = read_course_code().context("读取课程代码失败")?;

    let preview_rows = config.preview_rows;
    let scraper = CourseScraper::new(config)?;
    let outcome = scraper
        .scrape_course(&course_code, chrono::Local::now().date_naive())
        .await
        .with_context(|| format!("抓取课程 {} 失败", course_code))?;

    print!("{}", preview::render(&outcome.reviews.rows(), preview_rows));

    Ok(())
}

fn read_course_code() -> Result<String> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
    anyhow::bail!("标准输入中没有课程代码")
}
