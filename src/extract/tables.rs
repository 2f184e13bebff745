use crate::model::{ExtractedValue, IdGenerator, PageInput, SourceLocation, ValueType};
use crate::normalize::{extract_unit, first_numeric_value};

const DEFAULT_TABLE_CELL_CONFIDENCE: f32 = 0.8;

/// For each table, the first row is headers. Every subsequent cell
/// containing at least one digit becomes a numeric value.
pub fn extract_table_values(page: &PageInput, id_gen: &IdGenerator) -> Vec<ExtractedValue> {
    let mut values = Vec::new();

    for table in &page.metadata.tables {
        let mut rows = table.rows.iter();
        let Some(header_row) = rows.next() else {
            continue;
        };

        for (row_idx, row) in rows.enumerate() {
            let data_row_number = row_idx + 2; // 1-indexed, header is row 1
            for (col_idx, cell) in row.cells.iter().enumerate() {
                if !cell.text.chars().any(|c| c.is_ascii_digit()) {
                    continue;
                }

                let header = header_row
                    .cells
                    .get(col_idx)
                    .map(|h| h.text.clone())
                    .unwrap_or_else(|| format!("Column {}", col_idx + 1));

                let confidence = cell
                    .confidence
                    .or(table.confidence)
                    .unwrap_or(DEFAULT_TABLE_CELL_CONFIDENCE);

                let mut source = SourceLocation::new(page.page_number, page.classification.clone(), header.clone())
                    .with_context(format!("Row {data_row_number}, {header}"));
                if let Some(bbox) = cell.bounding_box {
                    source = source.with_bounding_box(bbox);
                }

                values.push(ExtractedValue {
                    id: id_gen.next_value_id(),
                    raw_value: cell.text.clone(),
                    numeric_value: first_numeric_value(&cell.text),
                    unit: extract_unit(&cell.text),
                    value_type: ValueType::Numeric,
                    source,
                    confidence,
                    is_handwritten: false,
                });
            }
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageExtractionMetadata, Table, TableCell, TableRow};

    fn cell(text: &str) -> TableCell {
        TableCell {
            text: text.to_string(),
            is_header: false,
            row_index: None,
            col_index: None,
            col_span: None,
            row_span: None,
            bounding_box: None,
            confidence: None,
        }
    }

    #[test]
    fn non_numeric_cells_are_skipped() {
        let page = PageInput {
            page_number: 1,
            classification: "materials_log".into(),
            extracted_text: String::new(),
            metadata: PageExtractionMetadata {
                form_fields: vec![],
                tables: vec![Table {
                    rows: vec![
                        TableRow { cells: vec![cell("Material"), cell("Qty")] },
                        TableRow { cells: vec![cell("Sucrose"), cell("120 kg")] },
                    ],
                    confidence: None,
                    bounding_box: None,
                }],
                handwritten: vec![],
            },
        };
        let gen = IdGenerator::default();
        let values = extract_table_values(&page, &gen);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].source.field_label, "Qty");
        assert_eq!(values[0].source.surrounding_context, "Row 2, Qty");
        assert_eq!(values[0].numeric_value, Some(120.0));
    }

    #[test]
    fn missing_header_falls_back_to_column_number() {
        let page = PageInput {
            page_number: 1,
            classification: "materials_log".into(),
            extracted_text: String::new(),
            metadata: PageExtractionMetadata {
                form_fields: vec![],
                tables: vec![Table {
                    rows: vec![
                        TableRow { cells: vec![cell("A")] },
                        TableRow { cells: vec![cell("A"), cell("42")] },
                    ],
                    confidence: None,
                    bounding_box: None,
                }],
                handwritten: vec![],
            },
        };
        let gen = IdGenerator::default();
        let values = extract_table_values(&page, &gen);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].source.field_label, "Column 2");
    }
}
