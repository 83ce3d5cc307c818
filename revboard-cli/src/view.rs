//! Plain-text drawing of a [`TableView`].

use std::fmt::Write;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use revboard_table::{
    Alignment, Body, EmptyReason, PageSelection, PaginationFooter, PaginationKind, SortDirection,
    TableView,
};

const MAX_COLUMN_WIDTH: usize = 24;

fn sort_marker(sort: Option<SortDirection>, priority: Option<usize>) -> String {
    match (sort, priority) {
        (Some(SortDirection::Asc), Some(0)) => " ^".to_string(),
        (Some(SortDirection::Desc), Some(0)) => " v".to_string(),
        (Some(SortDirection::Asc), Some(p)) => format!(" ^{}", p + 1),
        (Some(SortDirection::Desc), Some(p)) => format!(" v{}", p + 1),
        _ => String::new(),
    }
}

/// Fit `text` into `width` terminal columns.
fn pad(text: &str, width: usize, align: Alignment) -> String {
    let mut fitted = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        fitted.push(ch);
        used += w;
    }
    let gap = width - used;
    let (left, right) = match align {
        Alignment::Left => (0, gap),
        Alignment::Center => (gap / 2, gap - gap / 2),
        Alignment::Right => (gap, 0),
    };
    format!("{}{}{}", " ".repeat(left), fitted, " ".repeat(right))
}

/// Draw the whole view into a string.
pub fn draw(view: &TableView) -> String {
    let mut out = String::new();

    let toolbar = &view.toolbar;
    if toolbar.filter_enabled {
        let _ = writeln!(out, "Filter: [{}]", toolbar.filter_text);
    }
    let hidden: Vec<&str> = toolbar
        .columns
        .iter()
        .filter(|c| !c.visible)
        .map(|c| c.column_id.as_str())
        .collect();
    if !hidden.is_empty() {
        let _ = writeln!(out, "Hidden: {}", hidden.join(", "));
    }
    if toolbar.selected_count > 0 {
        let _ = writeln!(out, "Selected: {}", toolbar.selected_count);
    }

    let labels: Vec<String> = view
        .header
        .iter()
        .map(|h| format!("{}{}", h.label, sort_marker(h.sort, h.sort_priority)))
        .collect();

    let mut widths: Vec<usize> = labels.iter().map(|l| l.width()).collect();
    if let Body::Rows(rows) = &view.body {
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.content.text().width());
            }
        }
    }
    for (width, header) in widths.iter_mut().zip(&view.header) {
        let cap = header.width.map_or(MAX_COLUMN_WIDTH, usize::from);
        *width = (*width).min(cap.max(1));
    }

    let check = match view.page_selection {
        Some(PageSelection::All) => "[x] ",
        Some(PageSelection::Some) => "[-] ",
        Some(PageSelection::None) => "[ ] ",
        None => "",
    };
    let header_line: Vec<String> = labels
        .iter()
        .zip(&widths)
        .zip(&view.header)
        .map(|((label, &width), header)| pad(label, width, header.align))
        .collect();
    let _ = writeln!(out, "{}{}", check, header_line.join(" | "));
    let rule_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
    let _ = writeln!(out, "{}{}", " ".repeat(check.len()), "-".repeat(rule_width));

    match &view.body {
        Body::Loading { skeleton_rows } => {
            for _ in 0..*skeleton_rows {
                let cells: Vec<String> = widths.iter().map(|&w| ".".repeat(w)).collect();
                let _ = writeln!(out, "{}{}", " ".repeat(check.len()), cells.join("   "));
            }
        }
        Body::Empty(EmptyReason::NoRows) => {
            let _ = writeln!(out, "No data.");
        }
        Body::Empty(EmptyReason::NoMatches) => {
            let _ = writeln!(out, "No rows match the current filters.");
        }
        Body::Rows(rows) => {
            for row in rows {
                let mark = match (view.page_selection.is_some(), row.selected) {
                    (false, _) => "",
                    (true, true) => "[x] ",
                    (true, false) => "[ ] ",
                };
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .zip(&widths)
                    .map(|(cell, &width)| pad(cell.content.text(), width, cell.align))
                    .collect();
                let _ = writeln!(out, "{}{}", mark, cells.join(" | "));
            }
        }
    }

    let _ = writeln!(out, "{}", footer_line(&view.footer));
    out
}

fn footer_line(footer: &PaginationFooter) -> String {
    let mut line = format!(
        "Page {} of {}",
        footer.page_index + 1,
        footer.page_count.max(1)
    );
    if let Some(total) = footer.total_rows {
        let _ = write!(line, " ({} rows)", total);
    }
    if footer.mode == PaginationKind::Server {
        line.push_str(" [server]");
    }
    let sizes: Vec<String> = footer
        .page_size_options
        .iter()
        .map(|&size| {
            if size == footer.page_size {
                format!("*{}", size)
            } else {
                size.to_string()
            }
        })
        .collect();
    let _ = write!(
        line,
        "  size: {}  {}{}",
        sizes.join("/"),
        if footer.has_previous { "<prev " } else { "" },
        if footer.has_next { "next>" } else { "" }
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_truncates_and_aligns() {
        assert_eq!(pad("revenue", 4, Alignment::Left), "reve");
        assert_eq!(pad("7", 3, Alignment::Right), "  7");
        assert_eq!(pad("ab", 4, Alignment::Center), " ab ");
    }

    #[test]
    fn test_sort_marker() {
        assert_eq!(sort_marker(Some(SortDirection::Asc), Some(0)), " ^");
        assert_eq!(sort_marker(Some(SortDirection::Desc), Some(1)), " v2");
        assert_eq!(sort_marker(None, None), "");
    }
}
