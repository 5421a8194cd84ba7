//! Table detection from text positions.
//!
//! Tables are found without ruling lines: spans are grouped into rows by
//! baseline, column edges are taken from left edges that line up across
//! rows, and contiguous runs of well-aligned rows become tables.

use std::collections::{HashMap, HashSet};

use crate::model::TableGrid;

use super::layout::TextSpan;

/// A detected table region.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Right X boundary
    pub right_x: f32,
    /// Column start positions (X coordinates)
    pub columns: Vec<f32>,
    /// Rows of spans, top to bottom
    pub rows: Vec<TableRowData>,
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Y position of this row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 8,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Detects tables in the text spans of a page.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables and return them as cell grids, top to bottom.
    ///
    /// Grids without any non-empty cell are dropped.
    pub fn detect_grids(&self, spans: &[TextSpan]) -> Vec<TableGrid> {
        self.detect(spans)
            .iter()
            .map(|table| self.to_grid(table))
            .filter(|grid| grid.iter().flatten().any(Option::is_some))
            .collect()
    }

    /// Detect table regions in the given spans.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            log::debug!("TableDetector: not enough spans ({})", spans.len());
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, column edges {:?}",
            rows.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut tables = Vec::new();
        for (start_row, end_row) in self.find_table_regions(&rows, &columns) {
            let table_rows: Vec<TableRowData> = rows[start_row..=end_row].to_vec();

            // Re-detect columns for this region only
            let table_columns = self.detect_columns(&table_rows);

            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({})",
                    table_columns.len()
                );
                continue;
            }
            if self.is_list_pattern(&table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, looks like a list");
                continue;
            }

            let right_x = table_rows
                .iter()
                .flat_map(|r| r.spans.iter())
                .map(|s| s.x + s.width)
                .fold(f32::MIN, f32::max);

            tables.push(DetectedTable {
                right_x,
                columns: table_columns,
                rows: table_rows,
            });
        }

        tables
    }

    /// Convert a detected table to a grid; cells with no text become `None`.
    pub fn to_grid(&self, detected: &DetectedTable) -> TableGrid {
        let columns = &detected.columns;

        detected
            .rows
            .iter()
            .map(|row| {
                let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
                for span in &row.spans {
                    let col_idx = find_column_for_span(span.x, columns, detected.right_x);
                    if let Some(cell) = cells.get_mut(col_idx) {
                        cell.push(span.text.trim());
                    }
                }
                cells
                    .into_iter()
                    .map(|parts| {
                        let text = parts.join(" ");
                        if text.trim().is_empty() {
                            None
                        } else {
                            Some(text)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut sorted_spans = spans.to_vec();
        sorted_spans.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current_row_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        let finish_row = |spans: Vec<TextSpan>, rows: &mut Vec<TableRowData>| {
            let avg_y = spans.iter().map(|s| s.y).sum::<f32>() / spans.len() as f32;
            rows.push(TableRowData { y: avg_y, spans });
        };

        for span in sorted_spans {
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => current_row_spans.push(span),
                _ => {
                    if !current_row_spans.is_empty() {
                        finish_row(std::mem::take(&mut current_row_spans), &mut rows);
                    }
                    current_y = Some(span.y);
                    current_row_spans.push(span);
                }
            }
        }

        if !current_row_spans.is_empty() {
            finish_row(current_row_spans, &mut rows);
        }

        rows
    }

    /// Column edges: left-edge buckets shared by enough rows.
    ///
    /// Rows with several spans are the best evidence; when there are too
    /// few of them every row votes, once per span.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        const BUCKET_SIZE: f32 = 5.0;

        let multi_span_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let use_multi = multi_span_rows.len() >= self.config.min_rows;

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let voters = if use_multi {
            for row in &multi_span_rows {
                let buckets: HashSet<i32> = row
                    .spans
                    .iter()
                    .map(|s| (s.x / BUCKET_SIZE).round() as i32)
                    .collect();
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
            multi_span_rows.len()
        } else {
            for span in rows.iter().flat_map(|r| r.spans.iter()) {
                *edge_counts
                    .entry((span.x / BUCKET_SIZE).round() as i32)
                    .or_insert(0) += 1;
            }
            rows.len()
        };

        let min_occurrences =
            ((voters as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * BUCKET_SIZE)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Contiguous row ranges (inclusive) whose spans line up with `columns`.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut current_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.config.min_alignment_ratio {
                current_start.get_or_insert(i);
            } else if let Some(start) = current_start.take() {
                if i - start >= self.config.min_rows {
                    regions.push((start, i - 1));
                }
            }
        }

        if let Some(start) = current_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    fn alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let tolerance = 5.0;
        let aligned = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= tolerance))
            .count();

        aligned as f32 / row.spans.len() as f32
    }

    /// Numbered or bulleted lists split into marker + text spans look like
    /// two-column tables.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;

        for row in rows {
            let first_span = row
                .spans
                .iter()
                .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

            if let Some(span) = first_span {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;

        bullet_ratio >= 0.5 || (columns.len() == 2 && total_ratio >= 0.5)
    }
}

fn find_column_for_span(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    if columns.is_empty() {
        return 0;
    }

    // Allow spans to start up to 10pt before their column edge
    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (span_x - **a)
                .abs()
                .partial_cmp(&(span_x - **b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "□" | "◆" | "▶" | "➤"
    )
}

/// Number-style list markers: `1.`, `12)`, bare numbers, `a.`, `B)`.
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(text: &str, x: f32, y: f32) -> TextSpan {
        TextSpan::new(text.to_string(), x, y, 12.0, "Helvetica".to_string())
    }

    fn cable_table() -> Vec<TextSpan> {
        vec![
            make_span("Size", 72.0, 700.0),
            make_span("Weight", 200.0, 700.0),
            make_span("Voltage", 330.0, 700.0),
            make_span("1x1.5", 72.0, 685.0),
            make_span("120", 200.0, 685.0),
            make_span("0.6/1kV", 330.0, 685.0),
            make_span("1x2.5", 72.0, 670.0),
            make_span("145", 200.0, 670.0),
            make_span("0.6/1kV", 330.0, 670.0),
        ]
    }

    #[test]
    fn test_group_into_rows() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("A1", 10.0, 100.0),
            make_span("B1", 60.0, 100.0),
            make_span("A2", 10.0, 85.0),
            make_span("B2", 60.0, 85.0),
        ];

        let rows = detector.group_into_rows(&spans);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spans.len(), 2);
        assert_eq!(rows[0].spans[0].text, "A1");
    }

    #[test]
    fn test_detect_columns() {
        let detector = TableDetector::new();
        let rows = detector.group_into_rows(&cable_table());
        let columns = detector.detect_columns(&rows);
        assert_eq!(columns, vec![70.0, 200.0, 330.0]);
    }

    #[test]
    fn test_detect_grid() {
        let detector = TableDetector::new();
        let grids = detector.detect_grids(&cable_table());
        assert_eq!(grids.len(), 1);

        let grid = &grids[0];
        assert_eq!(grid.len(), 3);
        assert_eq!(
            grid[0],
            vec![
                Some("Size".to_string()),
                Some("Weight".to_string()),
                Some("Voltage".to_string())
            ]
        );
        assert_eq!(grid[2][1], Some("145".to_string()));
    }

    #[test]
    fn test_missing_cell_is_none() {
        let mut spans = cable_table();
        // Drop the "120" cell
        spans.remove(4);
        let grids = TableDetector::new().detect_grids(&spans);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0][1][1], None);
    }

    #[test]
    fn test_no_table_single_column() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("Line one", 72.0, 700.0),
            make_span("Line two", 72.0, 686.0),
            make_span("Line three", 72.0, 672.0),
            make_span("Line four", 72.0, 658.0),
        ];
        assert!(detector.detect_grids(&spans).is_empty());
    }

    #[test]
    fn test_numbered_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("1.", 72.0, 700.0),
            make_span("Conductor made of copper", 100.0, 700.0),
            make_span("2.", 72.0, 685.0),
            make_span("Insulation of XLPE", 100.0, 685.0),
            make_span("3.", 72.0, 670.0),
            make_span("Sheath of PVC", 100.0, 670.0),
        ];
        assert!(detector.detect(&spans).is_empty());
    }

    #[test]
    fn test_bullet_list_not_detected_as_table() {
        let detector = TableDetector::new();
        let spans = vec![
            make_span("•", 72.0, 700.0),
            make_span("Flame retardant", 100.0, 700.0),
            make_span("•", 72.0, 685.0),
            make_span("UV resistant", 100.0, 685.0),
        ];
        assert!(detector.detect(&spans).is_empty());
    }

    #[test]
    fn test_list_markers() {
        assert!(is_number_marker("1."));
        assert!(is_number_marker("12)"));
        assert!(is_number_marker("7"));
        assert!(is_number_marker("a."));
        assert!(!is_number_marker("0.6/1"));
        assert!(!is_number_marker("Size"));
        assert!(is_bullet_marker("•"));
        assert!(!is_bullet_marker("x"));
    }
}
