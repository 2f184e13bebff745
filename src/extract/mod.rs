//! Turns page metadata and raw OCR text into a flat list of typed
//! `ExtractedValue`s. Structured form fields, table cells, handwritten
//! regions, and text-pattern hits are four shapes feeding one
//! container type.

pub mod form_fields;
pub mod handwritten;
pub mod raw_text;
pub mod tables;

use crate::model::{ExtractedValue, IdGenerator, PageInput};

pub fn extract_page_values(page: &PageInput, id_gen: &IdGenerator) -> Vec<ExtractedValue> {
    let mut values = form_fields::extract_form_field_values(page, id_gen);
    values.extend(tables::extract_table_values(page, id_gen));
    values.extend(handwritten::extract_handwritten_values(page, id_gen));
    values.extend(raw_text::extract_raw_text_values(page, id_gen));
    values
}
