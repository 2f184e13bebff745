use serde::{Deserialize, Serialize};

/// Pixel-space bounding box on the page image. All-zero means "unknown".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Where a value or alert originated, so the UI can highlight it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub page_number: u32,
    pub section_type: String,
    pub field_label: String,
    pub bounding_box: BoundingBox,
    pub surrounding_context: String,
}

impl SourceLocation {
    pub fn new(page_number: u32, section_type: impl Into<String>, field_label: impl Into<String>) -> Self {
        Self {
            page_number,
            section_type: section_type.into(),
            field_label: field_label.into(),
            bounding_box: BoundingBox::unknown(),
            surrounding_context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.surrounding_context = context.into();
        self
    }

    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = bbox;
        self
    }
}

/// Classification of a value's content, used to decide how it can be
/// compared and which SOP operators apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Numeric,
    Date,
    Time,
    Datetime,
    Text,
    Boolean,
}

/// A single typed value pulled out of page metadata or raw OCR text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedValue {
    pub id: String,
    pub raw_value: String,
    pub numeric_value: Option<f64>,
    pub unit: Option<String>,
    pub value_type: ValueType,
    pub source: SourceLocation,
    pub confidence: f32,
    pub is_handwritten: bool,
}

impl ExtractedValue {
    /// `value_type == Numeric` implies `numeric_value.is_some()`.
    pub fn is_well_formed(&self) -> bool {
        self.value_type != ValueType::Numeric || self.numeric_value.is_some()
    }
}

/// Role a formula operand plays in its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandRole {
    Numerator,
    Denominator,
    Base,
    Subtrahend,
    Operand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaOperand {
    pub role: OperandRole,
    pub value_id: String,
    pub label: String,
    pub value: f64,
}

/// Which calculation a `DetectedFormula` represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaType {
    YieldPercentage,
    MaterialReconciliation,
    TemperatureAverage,
    HoldTime,
    PressureDifferential,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedFormula {
    pub id: String,
    pub formula_type: FormulaType,
    pub expression: String,
    pub operands: Vec<FormulaOperand>,
    pub expected_result: f64,
    pub actual_result: Option<f64>,
    pub discrepancy: Option<f64>,
    pub tolerance_percent: f64,
    pub is_within_tolerance: bool,
    pub source: SourceLocation,
}

/// Severity of a validation alert, ordered most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exhaustive alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    CalculationError,
    MissingValue,
    RangeViolation,
    SequenceError,
    UnitMismatch,
    TrendAnomaly,
    ConsistencyError,
    FormatError,
    SopViolation,
    DataQuality,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 10] = [
        AlertCategory::CalculationError,
        AlertCategory::MissingValue,
        AlertCategory::RangeViolation,
        AlertCategory::SequenceError,
        AlertCategory::UnitMismatch,
        AlertCategory::TrendAnomaly,
        AlertCategory::ConsistencyError,
        AlertCategory::FormatError,
        AlertCategory::SopViolation,
        AlertCategory::DataQuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::CalculationError => "calculation_error",
            AlertCategory::MissingValue => "missing_value",
            AlertCategory::RangeViolation => "range_violation",
            AlertCategory::SequenceError => "sequence_error",
            AlertCategory::UnitMismatch => "unit_mismatch",
            AlertCategory::TrendAnomaly => "trend_anomaly",
            AlertCategory::ConsistencyError => "consistency_error",
            AlertCategory::FormatError => "format_error",
            AlertCategory::SopViolation => "sop_violation",
            AlertCategory::DataQuality => "data_quality",
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding. Resolution fields are intentionally
/// absent — the engine emits alerts, it never resolves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationAlert {
    pub id: String,
    pub category: AlertCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub details: String,
    pub source: SourceLocation,
    pub related_values: Vec<String>,
    pub suggested_action: Option<String>,
    pub rule_id: Option<String>,
    pub formula_id: Option<String>,
}
