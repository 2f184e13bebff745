use crate::model::{ExtractedValue, IdGenerator, PageInput, SourceLocation};
use crate::normalize::{determine_value_type, extract_unit, first_numeric_value};

const DEFAULT_HANDWRITTEN_CONFIDENCE: f32 = 0.7;

pub fn extract_handwritten_values(page: &PageInput, id_gen: &IdGenerator) -> Vec<ExtractedValue> {
    page.metadata
        .handwritten
        .iter()
        .map(|region| {
            let label = region
                .nearby_label
                .clone()
                .unwrap_or_else(|| "Handwritten entry".to_string());
            let mut source = SourceLocation::new(page.page_number, page.classification.clone(), label);
            if let Some(bbox) = region.bounding_box {
                source = source.with_bounding_box(bbox);
            }

            ExtractedValue {
                id: id_gen.next_value_id(),
                raw_value: region.text.clone(),
                numeric_value: first_numeric_value(&region.text),
                unit: extract_unit(&region.text),
                value_type: determine_value_type(&region.text),
                source,
                confidence: DEFAULT_HANDWRITTEN_CONFIDENCE,
                is_handwritten: true,
            }
        })
        .collect()
}
