//! 终端预览：以固定宽度表格打印前几行结果

use crate::models::ReviewRow;
use crate::utils::logging::truncate_text;

const HEADERS: [&str; 5] = ["Course Code", "Course Name", "Date", "Author", "Content"];
const MAX_CELL: usize = 40;

/// 渲染前 `limit` 行为文本表格
pub fn render(rows: &[ReviewRow], limit: usize) -> String {
    let cells: Vec<[String; 5]> = rows
        .iter()
        .take(limit)
        .map(|row| {
            [
                &row.course_code,
                &row.course_name,
                &row.date,
                &row.author,
                &row.content,
            ]
            .map(|cell| truncate_text(&cell.split_whitespace().collect::<Vec<_>>().join(" "), MAX_CELL))
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let index_width = cells.len().saturating_sub(1).to_string().len();
    push_line(&mut out, &" ".repeat(index_width), &HEADERS.map(String::from), &widths);
    for (i, row) in cells.iter().enumerate() {
        push_line(&mut out, &format!("{:>w$}", i, w = index_width), row, &widths);
    }
    if cells.is_empty() {
        out.push_str("(no reviews)\n");
    }
    out
}

fn push_line(out: &mut String, index: &str, cells: &[String; 5], widths: &[usize; 5]) {
    out.push_str(index);
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width - cell.chars().count();
        out.push_str("  ");
        out.push_str(cell);
        out.push_str(&" ".repeat(pad));
    }
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(author: &str, content: &str) -> ReviewRow {
        ReviewRow {
            course_code: "CS1010".to_string(),
            course_name: "Programming Methodology".to_string(),
            date: "2024-01-01 10:30:00".to_string(),
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_render_limits_rows() {
        let rows: Vec<_> = (0..8).map(|i| row(&format!("user{}", i), "ok")).collect();
        let table = render(&rows, 5);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Course Code"));
        assert!(lines[5].contains("user4"));
        assert!(!table.contains("user5"));
    }

    #[test]
    fn test_render_flattens_multiline_content() {
        let table = render(&[row("a", "first\nsecond")], 5);
        assert!(table.contains("first second"));
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn test_render_empty() {
        assert!(render(&[], 5).contains("(no reviews)"));
    }
}
