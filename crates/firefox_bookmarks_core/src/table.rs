const BORDER: char = '|';
const RULE: char = '-';

/// Render a string sheet as a bordered, left-aligned ASCII table.
///
/// Widths are measured in chars. The first row is set off by a rule when
/// `header_separator` is enabled and there are data rows below it.
pub fn render(sheet: &[Vec<String>], header_separator: bool) -> Vec<String> {
    if sheet.is_empty() {
        return Vec::new();
    }

    let widths = column_widths(sheet);
    // `| ` + cells joined by ` | ` + ` |`
    let table_width = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3 + 4;
    let rule: String = std::iter::repeat_n(RULE, table_width).collect();

    let mut lines = Vec::with_capacity(sheet.len() + 3);
    lines.push(rule.clone());
    for (index, row) in sheet.iter().enumerate() {
        lines.push(render_row(row, &widths));
        if index == 0 && header_separator && sheet.len() > 1 {
            lines.push(rule.clone());
        }
    }
    lines.push(rule);
    lines
}

fn column_widths(sheet: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for row in sheet {
        for (index, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(index) {
                Some(current) => *current = (*current).max(width),
                None => widths.push(width),
            }
        }
    }
    widths
}

fn render_row(row: &[String], widths: &[usize]) -> String {
    let mut line = format!("{BORDER} ");
    for (index, width) in widths.iter().enumerate() {
        if index > 0 {
            line.push_str(&format!(" {BORDER} "));
        }
        let cell = row.get(index).map(String::as_str).unwrap_or("");
        line.push_str(&format!("{cell:<width$}"));
    }
    line.push_str(&format!(" {BORDER}"));
    line
}
