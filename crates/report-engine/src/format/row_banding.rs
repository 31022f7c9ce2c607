use crate::event::{ReportEvent, ReportEventKind};
use crate::format::element_format::{ElementFormatFunction, ElementFormatProcessor};
use crate::runtime::ExpressionRuntime;
use report_model::structure::{Section, SectionKind, StyleKey};
use report_model::Value;

/// Alternates item-band visibility row by row (zebra striping by stacking
/// a filled band behind every other row).
#[derive(Debug, Clone)]
pub struct RowBanding {
    initial_visible: bool,
    visible: bool,
}

impl RowBanding {
    #[must_use]
    pub fn new(initial_visible: bool) -> Self {
        Self {
            initial_visible,
            visible: initial_visible,
        }
    }
}

impl ElementFormatProcessor for RowBanding {
    fn update(&mut self, event: &ReportEvent<'_>, _runtime: &ExpressionRuntime<'_>) {
        match event.kind() {
            ReportEventKind::ReportInitialized | ReportEventKind::GroupStarted => {
                self.visible = self.initial_visible;
            }
            ReportEventKind::ItemsAdvanced => {
                self.visible = !self.visible;
            }
            _ => {}
        }
    }

    fn process_band(&mut self, band: &mut Section) -> bool {
        fn apply(band: &mut Section, visible: bool) -> bool {
            let mut found = false;
            for child in band.sections_mut() {
                if child.kind() == SectionKind::ItemBand {
                    child.set_style(StyleKey::Visible, Value::Bool(visible));
                    found = true;
                }
                found |= apply(child, visible);
            }
            found
        }
        apply(band, self.visible)
    }
}

/// Convenience constructor for the banding format function.
#[must_use]
pub fn row_banding(
    name: impl Into<String>,
    initial_visible: bool,
) -> ElementFormatFunction<RowBanding> {
    ElementFormatFunction::new(name, RowBanding::new(initial_visible))
}
