use crate::model::{ExtractedValue, IdGenerator, PageInput, SourceLocation};
use crate::normalize::{determine_value_type, extract_unit, first_numeric_value};

const DEFAULT_FORM_FIELD_CONFIDENCE: f32 = 0.8;

/// Emit one value per form field, even when its value is empty — the
/// label's presence is itself a fact used by presence rules.
pub fn extract_form_field_values(page: &PageInput, id_gen: &IdGenerator) -> Vec<ExtractedValue> {
    page.metadata
        .form_fields
        .iter()
        .map(|field| {
            let value_type = determine_value_type(&field.field_value);
            let numeric_value = first_numeric_value(&field.field_value);
            let unit = extract_unit(&field.field_value);
            let mut source = SourceLocation::new(page.page_number, page.classification.clone(), field.field_name.clone());
            if let Some(bbox) = field.bounding_box {
                source = source.with_bounding_box(bbox);
            }

            ExtractedValue {
                id: id_gen.next_value_id(),
                raw_value: field.field_value.clone(),
                numeric_value,
                unit,
                value_type,
                source,
                confidence: field.confidence.unwrap_or(DEFAULT_FORM_FIELD_CONFIDENCE),
                is_handwritten: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FormField, PageExtractionMetadata};

    fn page_with_fields(fields: Vec<FormField>) -> PageInput {
        PageInput {
            page_number: 1,
            classification: "filling_log".into(),
            extracted_text: String::new(),
            metadata: PageExtractionMetadata {
                form_fields: fields,
                tables: vec![],
                handwritten: vec![],
            },
        }
    }

    #[test]
    fn empty_field_value_still_emits_a_value() {
        let page = page_with_fields(vec![FormField {
            field_name: "Operator Signature".into(),
            field_value: String::new(),
            bounding_box: None,
            confidence: None,
        }]);
        let gen = IdGenerator::default();
        let values = extract_form_field_values(&page, &gen);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].raw_value, "");
    }

    #[test]
    fn numeric_field_parses_number_and_unit() {
        let page = page_with_fields(vec![FormField {
            field_name: "Output".into(),
            field_value: "900 ml".into(),
            bounding_box: None,
            confidence: None,
        }]);
        let gen = IdGenerator::default();
        let values = extract_form_field_values(&page, &gen);
        assert_eq!(values[0].numeric_value, Some(900.0));
        assert_eq!(values[0].unit.as_deref(), Some("ml"));
    }

    #[test]
    fn upstream_confidence_overrides_default() {
        let page = page_with_fields(vec![FormField {
            field_name: "Yield".into(),
            field_value: "85 %".into(),
            bounding_box: None,
            confidence: Some(0.95),
        }]);
        let gen = IdGenerator::default();
        let values = extract_form_field_values(&page, &gen);
        assert_eq!(values[0].confidence, 0.95);
    }
}
