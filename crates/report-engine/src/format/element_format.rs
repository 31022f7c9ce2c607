use crate::error::EngineError;
use crate::event::ReportEvent;
use crate::expression::Expression;
use crate::function::Function;
use crate::runtime::ExpressionRuntime;
use report_model::structure::{AttributeValue, Section, NS_INTERNAL};
use report_model::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Cache entry stored on a section: what the last walk concluded, and the
/// section's deep change tracker at that time. A tracker mismatch means the
/// entry is stale and must never be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedEvalResult {
    pub need_to_run: bool,
    pub change_tracker: u64,
}

/// Instance-unique token naming this function's cache attribute.
///
/// Regenerated on every duplication, so a clone and its original never
/// collide on cache entries even when they walk the same section tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceToken(Uuid);

impl InstanceToken {
    #[must_use]
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn attribute_name(&self) -> String {
        format!("need-eval-{}", self.0)
    }
}

/// The domain half of a format function: reacts to lifecycle events and
/// applies style mutations to a band subtree.
pub trait ElementFormatProcessor {
    /// Track lifecycle state (row parity, current group, ...).
    fn update(&mut self, event: &ReportEvent<'_>, runtime: &ExpressionRuntime<'_>);

    /// Re-apply this processor's mutations below `band`. Returns whether
    /// the walk found anything at all to evaluate; `false` lets future
    /// walks be skipped until the band changes.
    fn process_band(&mut self, band: &mut Section) -> bool;
}

/// Walks the report's band tree in response to layout events, memoizing
/// "does this band need re-evaluation" per section.
///
/// The cache entry lives in the section's internal attribute namespace
/// under this instance's token. A hit requires both a `need_to_run: false`
/// verdict *and* an unchanged deep change tracker; anything else re-walks
/// and refreshes the entry.
pub struct ElementFormatFunction<P> {
    name: Option<String>,
    dependency_level: i32,
    processor: P,
    token: InstanceToken,
    evaluations: u64,
    skipped_evaluations: u64,
}

impl<P: ElementFormatProcessor + Clone + 'static> ElementFormatFunction<P> {
    #[must_use]
    pub fn new(name: impl Into<String>, processor: P) -> Self {
        Self {
            name: Some(name.into()),
            dependency_level: report_model::LEVEL_STRUCTURAL,
            processor,
            token: InstanceToken::fresh(),
            evaluations: 0,
            skipped_evaluations: 0,
        }
    }

    #[must_use]
    pub fn token(&self) -> &InstanceToken {
        &self.token
    }

    /// Number of actual walks performed.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Number of walks skipped on a cache hit.
    #[must_use]
    pub fn skipped_evaluations(&self) -> u64 {
        self.skipped_evaluations
    }

    /// Apply the processor to `band`, consulting and refreshing the cache.
    pub fn process_root_band(&mut self, band: &mut Section) {
        let attribute = self.token.attribute_name();
        let cached = band
            .attribute(NS_INTERNAL, &attribute)
            .and_then(|a| a.downcast::<NeedEvalResult>())
            .copied();
        if let Some(entry) = cached {
            if !entry.need_to_run && entry.change_tracker == band.change_tracker_deep() {
                self.skipped_evaluations += 1;
                return;
            }
        }

        let need_to_run = self.processor.process_band(band);
        self.evaluations += 1;
        let entry = NeedEvalResult {
            need_to_run,
            change_tracker: band.change_tracker_deep(),
        };
        band.set_attribute(NS_INTERNAL, attribute, AttributeValue::Payload(Arc::new(entry)));
    }
}

impl<P: ElementFormatProcessor + Clone + 'static> Expression for ElementFormatFunction<P> {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn dependency_level(&self) -> i32 {
        self.dependency_level
    }

    fn set_dependency_level(&mut self, level: i32) {
        self.dependency_level = level;
    }

    fn evaluate(&self, _runtime: &ExpressionRuntime<'_>) -> Result<Value, EngineError> {
        // Format functions mutate layout; they publish no row value.
        Ok(Value::Null)
    }

    fn duplicate(&self) -> Box<dyn Expression> {
        Box::new(self.duplicated())
    }
}

impl<P: ElementFormatProcessor + Clone + 'static> Function for ElementFormatFunction<P> {
    fn report_event(
        &mut self,
        event: &ReportEvent<'_>,
        runtime: &ExpressionRuntime<'_>,
    ) -> Result<(), EngineError> {
        self.processor.update(event, runtime);
        Ok(())
    }

    fn duplicate_function(&self) -> Box<dyn Function> {
        Box::new(self.duplicated())
    }
}

impl<P: ElementFormatProcessor + Clone> ElementFormatFunction<P> {
    /// State-severing copy with a fresh instance token and zeroed counters.
    #[must_use]
    pub fn duplicated(&self) -> Self {
        Self {
            name: self.name.clone(),
            dependency_level: self.dependency_level,
            processor: self.processor.clone(),
            token: InstanceToken::fresh(),
            evaluations: 0,
            skipped_evaluations: 0,
        }
    }
}
