use crate::error::EngineError;
use crate::expression::Expression;
use crate::function::Function;
use ahash::AHashMap;

/// One registered entry: plain expression or lifecycle-aware function.
pub enum ExpressionEntry {
    Expression(Box<dyn Expression>),
    Function(Box<dyn Function>),
}

impl ExpressionEntry {
    #[must_use]
    pub fn as_expression(&self) -> &dyn Expression {
        match self {
            ExpressionEntry::Expression(e) => e.as_ref(),
            ExpressionEntry::Function(f) => f.as_ref(),
        }
    }

    pub fn as_expression_mut(&mut self) -> &mut dyn Expression {
        match self {
            ExpressionEntry::Expression(e) => e.as_mut(),
            ExpressionEntry::Function(f) => f.as_mut(),
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut dyn Function> {
        match self {
            ExpressionEntry::Expression(_) => None,
            ExpressionEntry::Function(f) => Some(f.as_mut()),
        }
    }

    /// State-severing copy, preserving the entry kind.
    #[must_use]
    pub fn duplicate(&self) -> ExpressionEntry {
        match self {
            ExpressionEntry::Expression(e) => ExpressionEntry::Expression(e.duplicate()),
            ExpressionEntry::Function(f) => ExpressionEntry::Function(f.duplicate_function()),
        }
    }
}

/// Ordered registry of expressions and functions with name-based lookup.
///
/// Declaration order is preserved (it breaks ties within one dependency
/// level); named entries must be unique since the data row publishes results
/// by name. [`ExpressionCollection::duplicate`] performs the deep copy that
/// gives every report run its own isolated instances.
#[derive(Default)]
pub struct ExpressionCollection {
    entries: Vec<ExpressionEntry>,
    by_name: AHashMap<String, usize>,
}

impl ExpressionCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ExpressionEntry) -> Result<(), EngineError> {
        if let Some(name) = entry.as_expression().name() {
            if self.by_name.contains_key(name) {
                return Err(EngineError::DuplicateName(name.to_string()));
            }
            self.by_name.insert(name.to_string(), self.entries.len());
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn push_expression(
        &mut self,
        expression: Box<dyn Expression>,
    ) -> Result<(), EngineError> {
        self.push(ExpressionEntry::Expression(expression))
    }

    pub fn push_function(&mut self, function: Box<dyn Function>) -> Result<(), EngineError> {
        self.push(ExpressionEntry::Function(function))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Expression> {
        self.index_of(name)
            .map(|idx| self.entries[idx].as_expression())
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpressionEntry> {
        self.entries.iter()
    }

    pub(crate) fn into_entries(self) -> Vec<ExpressionEntry> {
        self.entries
    }

    /// Deep, state-severing copy of every entry, in order.
    #[must_use]
    pub fn duplicate(&self) -> ExpressionCollection {
        let mut copy = ExpressionCollection::new();
        for entry in &self.entries {
            // Names were unique on the way in, so re-inserting cannot fail.
            let _ = copy.push(entry.duplicate());
        }
        copy
    }
}
