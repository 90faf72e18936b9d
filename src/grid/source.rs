use std::sync::Arc;

/// A named tabular payload, one grid per tracked week. The parser doesn't
/// care whether the rows came out of a csv file or a spreadsheet sheet, both
/// are normalized to the same row/column shape before they get here.
#[derive(Debug, Clone)]
pub struct RawSource {
    /// File stem or sheet name. Must encode a [crate::model::period::PeriodKey].
    pub name: Arc<str>,
    pub rows: Vec<Vec<String>>,
    /// Year to assume for bare `M.W` names, which don't carry one themselves.
    pub sheet_year: Option<i32>,
}

impl RawSource {
    pub fn new(name: impl Into<Arc<str>>, rows: Vec<Vec<String>>) -> RawSource {
        RawSource {
            name: name.into(),
            rows,
            sheet_year: None,
        }
    }

    pub fn with_sheet_year(mut self, year: Option<i32>) -> RawSource {
        self.sheet_year = year;
        self
    }
}
