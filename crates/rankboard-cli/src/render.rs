//! Plain-text rendering of a [`DashboardView`].

use std::fmt::Write;

use rankboard_core::{DashboardView, NumberFormat};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Column-aligned table with a header rule. Widths count chars, so
/// accented labels line up.
fn table(headers: &[&str], align: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut line = |cells: &mut dyn Iterator<Item = &str>| {
        let mut buf = String::new();
        for (i, cell) in cells.enumerate() {
            if i > 0 {
                buf.push_str("  ");
            }
            let pad = widths[i].saturating_sub(cell.chars().count());
            match align.get(i).copied().unwrap_or(Align::Left) {
                Align::Left => {
                    buf.push_str(cell);
                    buf.extend(std::iter::repeat_n(' ', pad));
                }
                Align::Right => {
                    buf.extend(std::iter::repeat_n(' ', pad));
                    buf.push_str(cell);
                }
            }
        }
        out.push_str(buf.trim_end());
        out.push('\n');
    };

    line(&mut headers.iter().copied());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&mut rule.iter().map(String::as_str));
    for row in rows {
        line(&mut row.iter().map(String::as_str));
    }
    out
}

pub fn render_text(view: &DashboardView, source_id: &str, format: &NumberFormat) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{source_id}: {} of {} records",
        view.filtered_rows, view.source_rows
    );
    let _ = writeln!(
        out,
        "value: {}  group: {}\n",
        view.value_column, view.group_column
    );

    let summary = [
        ("Total", view.formatted_summary.total.clone()),
        ("Mean", view.formatted_summary.mean.clone()),
        ("Max", view.formatted_summary.max.clone()),
        ("Records", view.formatted_summary.count.clone()),
        ("Distinct groups", view.distinct_groups.to_string()),
    ];
    let rows: Vec<Vec<String>> = summary
        .into_iter()
        .map(|(k, v)| vec![k.to_string(), v])
        .collect();
    out.push_str(&table(&["Metric", "Value"], &[Align::Left, Align::Right], &rows));

    out.push_str("\nRanking\n");
    let rows: Vec<Vec<String>> = view
        .ranking
        .iter()
        .map(|r| {
            vec![
                r.position.to_string(),
                r.label.clone(),
                r.formatted_total.clone(),
                r.count.to_string(),
            ]
        })
        .collect();
    out.push_str(&table(
        &["#", view.group_column.as_str(), view.value_column.as_str(), "records"],
        &[Align::Right, Align::Left, Align::Right, Align::Right],
        &rows,
    ));

    if view.chart.len() > 1 {
        out.push_str("\nChart\n");
        let rows: Vec<Vec<String>> = view
            .chart
            .iter()
            .flat_map(|s| {
                s.points
                    .iter()
                    .map(|p| vec![s.name.clone(), p.label.clone(), format.format(p.total)])
            })
            .collect();
        out.push_str(&table(
            &["series", "group", "total"],
            &[Align::Left, Align::Left, Align::Right],
            &rows,
        ));
    }

    if !view.detail.rows.is_empty() {
        let _ = writeln!(out, "\nTop {} records", view.detail.rows.len());
        let headers: Vec<&str> = std::iter::once("#")
            .chain(view.detail.columns.iter().map(String::as_str))
            .collect();
        let mut align = vec![Align::Right];
        align.extend(view.detail.columns.iter().map(|c| {
            if *c == view.value_column {
                Align::Right
            } else {
                Align::Left
            }
        }));
        let rows: Vec<Vec<String>> = view
            .detail
            .rows
            .iter()
            .map(|r| {
                std::iter::once(r.position.to_string())
                    .chain(r.cells.iter().cloned())
                    .collect()
            })
            .collect();
        out.push_str(&table(&headers, &align, &rows));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_columns_by_char_width() {
        let rows = vec![
            vec!["Notícias".to_string(), "1,300".to_string()],
            vec!["UOL".to_string(), "5".to_string()],
        ];
        let out = table(&["group", "total"], &[Align::Left, Align::Right], &rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "group     total");
        assert_eq!(lines[1], "--------  -----");
        assert_eq!(lines[2], "Notícias  1,300");
        assert_eq!(lines[3], "UOL           5");
    }
}
