use serde::Serialize;

/// Outcome of a JSON import. Structural problems never escape as errors:
/// they end up here with `success = false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub success: bool,
    pub imported: usize,
    pub duplicates: usize,
    pub errors: Vec<String>,
}

impl ImportResult {
    pub fn failed<T: Into<String>>(reason: T) -> Self {
        Self {
            success: false,
            imported: 0,
            duplicates: 0,
            errors: vec![reason.into()],
        }
    }
}
