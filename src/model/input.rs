use serde::{Deserialize, Serialize};

use super::types::BoundingBox;

/// A single labelled field from the upstream form-field extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub field_name: String,
    pub field_value: String,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    pub text: String,
    #[serde(default)]
    pub is_header: bool,
    #[serde(default)]
    pub row_index: Option<u32>,
    #[serde(default)]
    pub col_index: Option<u32>,
    #[serde(default)]
    pub col_span: Option<u32>,
    #[serde(default)]
    pub row_span: Option<u32>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandwrittenRegion {
    pub text: String,
    #[serde(default)]
    pub nearby_label: Option<String>,
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

/// Structured extraction metadata the OCR/document-understanding stage
/// hands the engine for a single page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageExtractionMetadata {
    #[serde(default)]
    pub form_fields: Vec<FormField>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub handwritten: Vec<HandwrittenRegion>,
}

/// Everything the engine needs to validate one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInput {
    pub page_number: u32,
    pub classification: String,
    pub extracted_text: String,
    pub metadata: PageExtractionMetadata,
}
