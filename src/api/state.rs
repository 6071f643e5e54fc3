use crate::lms::PercentileResolver;
use crate::report::ReportFormatter;
use crate::tables::ReferenceTable;

#[derive(Clone)]
pub struct AppState {
    pub table: &'static ReferenceTable,
    pub formatter: ReportFormatter,
}

impl AppState {
    pub fn new(table: &'static ReferenceTable, formatter: ReportFormatter) -> Self {
        Self { table, formatter }
    }

    pub fn resolver(&self) -> PercentileResolver<'static> {
        PercentileResolver::new(self.table)
    }
}
