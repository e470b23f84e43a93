//! Pipe table pass.
//!
//! A maximal run of contiguous `|...|` lines becomes one table. The first row
//! is the header. A delimiter row (`|---|:--:|`) right after it is consumed
//! and sets column alignment.

use crate::document::Document;

/// Column alignment from a delimiter row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn parse(cell: &str) -> Option<Self> {
        let dashes = cell.trim_start_matches(':').trim_end_matches(':');
        if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
            return None;
        }
        Some(match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Self::Center,
            (true, false) => Self::Left,
            (false, true) => Self::Right,
            (false, false) => Self::None,
        })
    }

    fn style(self) -> &'static str {
        match self {
            Self::Left => r#" style="text-align:left""#,
            Self::Center => r#" style="text-align:center""#,
            Self::Right => r#" style="text-align:right""#,
            Self::None => "",
        }
    }
}

fn is_row(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

/// Split a row into trimmed cells, dropping the outer empty cells.
fn cells(line: &str) -> Vec<&str> {
    let line = line.trim_end();
    line[1..line.len() - 1].split('|').map(str::trim).collect()
}

fn delimiter_row(line: &str) -> Option<Vec<Alignment>> {
    cells(line).into_iter().map(Alignment::parse).collect()
}

/// Replace every table run in the document.
pub(crate) fn render_tables(doc: &mut Document) {
    let text = doc.text().to_owned();
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut tables = 0usize;

    let mut index = 0;
    while index < lines.len() {
        if !is_row(lines[index]) {
            out.push(lines[index].to_owned());
            index += 1;
            continue;
        }

        let start = index;
        while index < lines.len() && is_row(lines[index]) {
            index += 1;
        }
        out.push(render_table(doc, &lines[start..index]));
        tables += 1;
    }

    if tables > 0 {
        tracing::trace!(tables, "Rendered tables");
        doc.set_text(out.join("\n"));
    }
}

fn render_table(doc: &mut Document, rows: &[&str]) -> String {
    let (header, mut body) = match rows.split_first() {
        Some((header, body)) => (*header, body),
        None => return String::new(),
    };

    let mut alignments = Vec::new();
    if let Some((second, rest)) = body.split_first()
        && let Some(parsed) = delimiter_row(second)
    {
        alignments = parsed;
        body = rest;
    }

    let mut out = doc.block("<table><thead>");
    render_row(doc, &mut out, header, "th", &alignments);
    out.push_str(&doc.block("</thead><tbody>"));
    for row in body {
        render_row(doc, &mut out, row, "td", &alignments);
    }
    out.push_str(&doc.block("</tbody></table>"));
    out
}

fn render_row(
    doc: &mut Document,
    out: &mut String,
    row: &str,
    tag: &str,
    alignments: &[Alignment],
) {
    out.push_str(&doc.block("<tr>"));
    for (i, cell) in cells(row).into_iter().enumerate() {
        let style = alignments.get(i).copied().unwrap_or(Alignment::None).style();
        out.push_str(&doc.block(format!("<{tag}{style}>")));
        out.push_str(cell);
        out.push_str(&doc.block(format!("</{tag}>")));
    }
    out.push_str(&doc.block("</tr>"));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(text: &str) -> String {
        let mut doc = Document::new(text);
        render_tables(&mut doc);
        doc.into_html()
    }

    #[test]
    fn test_simple_table() {
        assert_eq!(
            render("|a|b|\n|1|2|"),
            "<table><thead><tr><th>a</th><th>b</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_header_only_table() {
        assert_eq!(
            render("| Name |"),
            "<table><thead><tr><th>Name</th></tr></thead><tbody></tbody></table>"
        );
    }

    #[test]
    fn test_delimiter_row_sets_alignment() {
        assert_eq!(
            render("| L | C | R |\n|:--|:-:|--:|\n| 1 | 2 | 3 |"),
            "<table><thead><tr>\
             <th style=\"text-align:left\">L</th>\
             <th style=\"text-align:center\">C</th>\
             <th style=\"text-align:right\">R</th>\
             </tr></thead><tbody><tr>\
             <td style=\"text-align:left\">1</td>\
             <td style=\"text-align:center\">2</td>\
             <td style=\"text-align:right\">3</td>\
             </tr></tbody></table>"
        );
    }

    #[test]
    fn test_plain_delimiter_row_is_consumed() {
        assert_eq!(
            render("|a|\n|---|\n|1|"),
            "<table><thead><tr><th>a</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_table_runs_are_separate() {
        let html = render("|a|\n\ntext\n|b|");
        assert_eq!(html.matches("<table>").count(), 2);
        assert!(html.contains("\n\ntext\n"));
    }

    #[test]
    fn test_non_table_lines_untouched() {
        assert_eq!(render("a | b\n|not closed"), "a | b\n|not closed");
    }

    #[test]
    fn test_empty_cells_kept() {
        assert_eq!(
            render("|a||c|"),
            "<table><thead><tr><th>a</th><th></th><th>c</th></tr></thead><tbody></tbody></table>"
        );
    }
}
