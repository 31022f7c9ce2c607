mod common;

use common::{SimState, TestRow};
use pretty_assertions::assert_eq;
use report_engine::error::FormulaFailure;
use report_engine::formula::{
    CompiledFormula, FormulaBackend, FormulaContext, FormulaExpression, FormulaFunction,
};
use report_engine::{
    EngineError, Expression, ExpressionRuntime, Function, ProcessingContext, ReportEvent,
    ReportEventKind,
};
use report_model::config::STRICT_ERROR_HANDLING;
use report_model::{ReportConfiguration, Value, ValueError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the stub backend should do with every formula it receives.
#[derive(Clone)]
enum Script {
    /// Resolve the body as a field reference on every evaluation.
    ResolveBody,
    /// Reject the formula at compile time.
    RejectCompile,
    /// Compile fine, fail every evaluation.
    FailEvaluate,
}

struct ScriptedBackend {
    script: Script,
    compile_calls: AtomicUsize,
    evaluate_calls: Arc<AtomicUsize>,
    seen: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            compile_calls: AtomicUsize::new(0),
            evaluate_calls: Arc::new(AtomicUsize::new(0)),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn compiles(&self) -> usize {
        self.compile_calls.load(Ordering::SeqCst)
    }

    fn evaluations(&self) -> usize {
        self.evaluate_calls.load(Ordering::SeqCst)
    }

    fn last_seen(&self) -> (String, String) {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

struct ScriptedFormula {
    script: Script,
    body: String,
    evaluate_calls: Arc<AtomicUsize>,
}

impl CompiledFormula for ScriptedFormula {
    fn evaluate(&self, context: &dyn FormulaContext) -> Result<Value, FormulaFailure> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::FailEvaluate => Err(FormulaFailure::Evaluate("scripted failure".into())),
            _ => Ok(context.resolve(&self.body)),
        }
    }
}

impl FormulaBackend for ScriptedBackend {
    fn compile(
        &self,
        namespace: &str,
        body: &str,
    ) -> Result<Box<dyn CompiledFormula>, FormulaFailure> {
        self.compile_calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((namespace.to_string(), body.to_string()));
        if let Script::RejectCompile = self.script {
            return Err(FormulaFailure::Compile("scripted rejection".into()));
        }
        Ok(Box::new(ScriptedFormula {
            script: self.script.clone(),
            body: body.to_string(),
            evaluate_calls: Arc::clone(&self.evaluate_calls),
        }))
    }
}

fn evaluate(
    expression: &dyn Expression,
    row: &TestRow,
    config: &ReportConfiguration,
) -> Result<Value, EngineError> {
    let context = ProcessingContext::new(false, 0);
    let runtime = ExpressionRuntime::new(row, config, &context);
    expression.evaluate(&runtime)
}

#[test]
fn formula_compiles_once_and_resolves_fields() {
    let backend = ScriptedBackend::new(Script::ResolveBody);
    let expr = FormulaExpression::new("f", "=amount", backend.clone());
    let row = TestRow::of(&[("amount", Value::Integer(42))]);
    let config = ReportConfiguration::new();

    assert_eq!(evaluate(&expr, &row, &config).unwrap(), Value::Integer(42));
    assert_eq!(evaluate(&expr, &row, &config).unwrap(), Value::Integer(42));
    assert_eq!(backend.compiles(), 1);
    assert_eq!(backend.evaluations(), 2);
    // The `=` head selected the default namespace.
    assert_eq!(backend.last_seen(), ("report".to_string(), "amount".to_string()));
}

#[test]
fn explicit_namespace_reaches_the_backend() {
    let backend = ScriptedBackend::new(Script::ResolveBody);
    let expr = FormulaExpression::new("f", "bsh:row.amount", backend.clone());
    let row = TestRow::empty();
    let config = ReportConfiguration::new();

    evaluate(&expr, &row, &config).unwrap();
    assert_eq!(backend.last_seen(), ("bsh".to_string(), "row.amount".to_string()));
}

#[test]
fn compile_failure_is_cached() {
    let backend = ScriptedBackend::new(Script::RejectCompile);
    let expr = FormulaExpression::new("f", "=broken(", backend.clone());
    let row = TestRow::empty();
    let config = ReportConfiguration::new();

    assert_eq!(
        evaluate(&expr, &row, &config).unwrap(),
        Value::Error(ValueError::Invalid)
    );
    assert_eq!(
        evaluate(&expr, &row, &config).unwrap(),
        Value::Error(ValueError::Invalid)
    );
    // The known-bad formula was never re-attempted.
    assert_eq!(backend.compiles(), 1);
}

#[test]
fn evaluation_failure_is_cached() {
    let backend = ScriptedBackend::new(Script::FailEvaluate);
    let expr = FormulaExpression::new("f", "=explodes", backend.clone());
    let row = TestRow::empty();
    let config = ReportConfiguration::new();

    assert_eq!(
        evaluate(&expr, &row, &config).unwrap(),
        Value::Error(ValueError::Unexpected)
    );
    assert_eq!(
        evaluate(&expr, &row, &config).unwrap(),
        Value::Error(ValueError::Unexpected)
    );
    assert_eq!(backend.evaluations(), 1);
}

#[test]
fn strict_configuration_turns_failures_fatal() {
    let backend = ScriptedBackend::new(Script::FailEvaluate);
    let expr = FormulaExpression::new("f", "=explodes", backend);
    let row = TestRow::empty();
    let mut config = ReportConfiguration::new();
    config.set(STRICT_ERROR_HANDLING, "true");

    let err = evaluate(&expr, &row, &config).unwrap_err();
    assert!(matches!(
        err,
        EngineError::FormulaFailed { formula, .. } if formula == "=explodes"
    ));
}

#[test]
fn local_override_beats_the_configuration() {
    let backend = ScriptedBackend::new(Script::FailEvaluate);
    let expr =
        FormulaExpression::new("f", "=explodes", backend).with_fail_on_error(false);
    let row = TestRow::empty();
    let mut config = ReportConfiguration::new();
    config.set(STRICT_ERROR_HANDLING, "true");

    assert_eq!(
        evaluate(&expr, &row, &config).unwrap(),
        Value::Error(ValueError::Unexpected)
    );

    let backend = ScriptedBackend::new(Script::FailEvaluate);
    let expr = FormulaExpression::new("f", "=explodes", backend).with_fail_on_error(true);
    let config = ReportConfiguration::new();
    assert!(evaluate(&expr, &row, &config).is_err());
}

#[test]
fn duplicate_starts_with_a_cold_cache() {
    let backend = ScriptedBackend::new(Script::ResolveBody);
    let expr = FormulaExpression::new("f", "=amount", backend.clone());
    let row = TestRow::of(&[("amount", Value::Integer(1))]);
    let config = ReportConfiguration::new();

    evaluate(&expr, &row, &config).unwrap();
    let copy = expr.duplicate();
    evaluate(copy.as_ref(), &row, &config).unwrap();
    assert_eq!(backend.compiles(), 2);
}

#[test]
fn initial_formula_runs_once_per_report() {
    let backend = ScriptedBackend::new(Script::ResolveBody);
    let mut function = FormulaFunction::new("f", "=main", backend.clone())
        .with_initial("=initial", backend);
    let row = TestRow::of(&[
        ("main", Value::Text("main".into())),
        ("initial", Value::Text("initial".into())),
    ]);
    let config = ReportConfiguration::new();

    let state = SimState::output(0);
    let context = ProcessingContext::new(false, 0);
    let runtime = ExpressionRuntime::new(&row, &config, &context);
    function
        .report_event(
            &ReportEvent::new(ReportEventKind::ReportInitialized, &state),
            &runtime,
        )
        .unwrap();

    assert_eq!(
        evaluate(&function, &row, &config).unwrap(),
        Value::Text("initial".into())
    );
    assert_eq!(
        evaluate(&function, &row, &config).unwrap(),
        Value::Text("main".into())
    );
    assert_eq!(
        evaluate(&function, &row, &config).unwrap(),
        Value::Text("main".into())
    );

    // The next report run re-arms the initial formula.
    let runtime = ExpressionRuntime::new(&row, &config, &context);
    function
        .report_event(
            &ReportEvent::new(ReportEventKind::ReportInitialized, &state),
            &runtime,
        )
        .unwrap();
    assert_eq!(
        evaluate(&function, &row, &config).unwrap(),
        Value::Text("initial".into())
    );
}
