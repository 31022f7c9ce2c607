use report_model::{DataRow, ReportConfiguration};

/// Per-run processing flags shared by every evaluation in one pass.
#[derive(Debug, Clone)]
pub struct ProcessingContext {
    prepare_run: bool,
    processing_level: i32,
    export_descriptor: String,
}

impl ProcessingContext {
    #[must_use]
    pub fn new(prepare_run: bool, processing_level: i32) -> Self {
        Self {
            prepare_run,
            processing_level,
            export_descriptor: "table/plain".to_string(),
        }
    }

    #[must_use]
    pub fn with_export_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.export_descriptor = descriptor.into();
        self
    }

    /// `true` while values are being computed rather than recalled for
    /// emission. Total functions write their state sequences only in this
    /// phase.
    #[must_use]
    pub fn is_prepare_run(&self) -> bool {
        self.prepare_run
    }

    #[must_use]
    pub fn processing_level(&self) -> i32 {
        self.processing_level
    }

    /// Identifier of the output target, e.g. `table/plain` or `pageable/pdf`.
    #[must_use]
    pub fn export_descriptor(&self) -> &str {
        &self.export_descriptor
    }
}

/// The environment handed to every expression for exactly one evaluation.
///
/// Borrowed, read-only, and rebuilt per evaluation scope by the report
/// processor; nothing in here survives the call that received it.
pub struct ExpressionRuntime<'a> {
    data_row: &'a dyn DataRow,
    configuration: &'a ReportConfiguration,
    context: &'a ProcessingContext,
}

impl<'a> ExpressionRuntime<'a> {
    #[must_use]
    pub fn new(
        data_row: &'a dyn DataRow,
        configuration: &'a ReportConfiguration,
        context: &'a ProcessingContext,
    ) -> Self {
        Self {
            data_row,
            configuration,
            context,
        }
    }

    #[must_use]
    pub fn data_row(&self) -> &dyn DataRow {
        self.data_row
    }

    #[must_use]
    pub fn configuration(&self) -> &ReportConfiguration {
        self.configuration
    }

    #[must_use]
    pub fn context(&self) -> &ProcessingContext {
        self.context
    }
}
