mod common;

use common::{SimState, TestRow};
use pretty_assertions::assert_eq;
use report_engine::functions::{
    GroupCountFunction, ItemAvgFunction, ItemCountFunction, ItemMaxFunction, ItemMinFunction,
    ItemSumFunction, PageFunction,
};
use report_engine::{
    ExpressionRuntime, Function, ProcessingContext, ReportEvent, ReportEventKind,
};
use report_model::{ReportConfiguration, Value};
use rust_decimal::Decimal;

fn advance(function: &mut dyn Function, row: &TestRow, state: &SimState, kind: ReportEventKind) {
    advance_grouped(function, row, state, kind, None);
}

fn advance_grouped(
    function: &mut dyn Function,
    row: &TestRow,
    state: &SimState,
    kind: ReportEventKind,
    group: Option<&str>,
) {
    let config = ReportConfiguration::new();
    let context = ProcessingContext::new(state.prepare, state.level);
    let runtime = ExpressionRuntime::new(row, &config, &context);
    let mut event = ReportEvent::new(kind, state);
    if let Some(group) = group {
        event = event.with_group(group);
    }
    function.report_event(&event, &runtime).unwrap();
}

fn value_of(function: &dyn Function, row: &TestRow, state: &SimState) -> Value {
    let config = ReportConfiguration::new();
    let context = ProcessingContext::new(state.prepare, state.level);
    let runtime = ExpressionRuntime::new(row, &config, &context);
    function.evaluate(&runtime).unwrap()
}

#[test]
fn item_sum_accumulates_numeric_rows_and_skips_the_rest() {
    let mut sum = ItemSumFunction::new("sum", "sales");
    let state = SimState::prepare(0);
    let empty = TestRow::empty();

    advance(&mut sum, &empty, &state, ReportEventKind::ReportInitialized);
    for value in [
        Value::Integer(10),
        Value::Text("ignored".into()),
        Value::Number(2.5),
        Value::Null,
        Value::Decimal(Decimal::new(75, 1)),
    ] {
        let row = TestRow::of(&[("sales", value)]);
        advance(&mut sum, &row, &state, ReportEventKind::ItemsAdvanced);
    }

    assert_eq!(
        value_of(&sum, &empty, &state),
        Value::Decimal(Decimal::from(20))
    );
}

#[test]
fn group_reset_invariant() {
    let mut sum = ItemSumFunction::new("sum", "sales").with_group("G");
    let state = SimState::prepare(0);
    let empty = TestRow::empty();

    advance(&mut sum, &empty, &state, ReportEventKind::ReportInitialized);
    advance_grouped(&mut sum, &empty, &state, ReportEventKind::GroupStarted, Some("G"));
    for v in [10, 20] {
        let row = TestRow::of(&[("sales", Value::Integer(v))]);
        advance(&mut sum, &row, &state, ReportEventKind::ItemsAdvanced);
    }
    assert_eq!(
        value_of(&sum, &empty, &state),
        Value::Decimal(Decimal::from(30))
    );

    // A start of an unrelated group does not reset.
    advance_grouped(&mut sum, &empty, &state, ReportEventKind::GroupStarted, Some("H"));
    assert_eq!(
        value_of(&sum, &empty, &state),
        Value::Decimal(Decimal::from(30))
    );

    // The configured group does: the accumulator reads 0 immediately after.
    advance_grouped(&mut sum, &empty, &state, ReportEventKind::GroupStarted, Some("G"));
    assert_eq!(
        value_of(&sum, &empty, &state),
        Value::Decimal(Decimal::ZERO)
    );

    let row = TestRow::of(&[("sales", Value::Integer(7))]);
    advance(&mut sum, &row, &state, ReportEventKind::ItemsAdvanced);
    assert_eq!(
        value_of(&sum, &empty, &state),
        Value::Decimal(Decimal::from(7))
    );
}

#[test]
fn clone_isolation_for_accumulated_state() {
    let mut original = ItemSumFunction::new("sum", "sales");
    let state = SimState::prepare(0);
    let empty = TestRow::empty();

    advance(&mut original, &empty, &state, ReportEventKind::ReportInitialized);
    let clone_before = original.duplicate_function();
    for v in [10, 20, 30] {
        let row = TestRow::of(&[("sales", Value::Integer(v))]);
        advance(&mut original, &row, &state, ReportEventKind::ItemsAdvanced);
    }

    assert_eq!(
        value_of(&original, &empty, &state),
        Value::Decimal(Decimal::from(60))
    );
    // The pre-advancement clone saw none of it.
    assert_eq!(
        value_of(clone_before.as_ref(), &empty, &state),
        Value::Decimal(Decimal::ZERO)
    );

    // And mutating a post-advancement clone leaves the original alone.
    let mut clone_after = original.duplicate_function();
    let row = TestRow::of(&[("sales", Value::Integer(100))]);
    advance(clone_after.as_mut(), &row, &state, ReportEventKind::ItemsAdvanced);
    assert_eq!(
        value_of(&original, &empty, &state),
        Value::Decimal(Decimal::from(60))
    );
    assert_eq!(
        value_of(clone_after.as_ref(), &empty, &state),
        Value::Decimal(Decimal::from(160))
    );
}

#[test]
fn item_count_and_avg() {
    let mut count = ItemCountFunction::new("count");
    let mut avg = ItemAvgFunction::new("avg", "sales").with_scale(2);
    let state = SimState::prepare(0);
    let empty = TestRow::empty();

    advance(&mut count, &empty, &state, ReportEventKind::ReportInitialized);
    advance(&mut avg, &empty, &state, ReportEventKind::ReportInitialized);
    assert_eq!(value_of(&avg, &empty, &state), Value::Null);

    for v in [1, 2, 4] {
        let row = TestRow::of(&[("sales", Value::Integer(v))]);
        advance(&mut count, &row, &state, ReportEventKind::ItemsAdvanced);
        advance(&mut avg, &row, &state, ReportEventKind::ItemsAdvanced);
    }
    // A non-numeric row counts as a row but stays out of the average.
    let row = TestRow::of(&[("sales", Value::Text("n/a".into()))]);
    advance(&mut count, &row, &state, ReportEventKind::ItemsAdvanced);
    advance(&mut avg, &row, &state, ReportEventKind::ItemsAdvanced);

    assert_eq!(value_of(&count, &empty, &state), Value::Integer(4));
    assert_eq!(
        value_of(&avg, &empty, &state),
        Value::Decimal(Decimal::new(233, 2))
    );
}

#[test]
fn item_min_max_track_extrema() {
    let mut min = ItemMinFunction::new("min", "sales");
    let mut max = ItemMaxFunction::new("max", "sales");
    let state = SimState::prepare(0);
    let empty = TestRow::empty();

    advance(&mut min, &empty, &state, ReportEventKind::ReportInitialized);
    advance(&mut max, &empty, &state, ReportEventKind::ReportInitialized);
    assert_eq!(value_of(&min, &empty, &state), Value::Null);

    for v in [5, -3, 12, 7] {
        let row = TestRow::of(&[("sales", Value::Integer(v))]);
        advance(&mut min, &row, &state, ReportEventKind::ItemsAdvanced);
        advance(&mut max, &row, &state, ReportEventKind::ItemsAdvanced);
    }

    assert_eq!(value_of(&min, &empty, &state), Value::Integer(-3));
    assert_eq!(value_of(&max, &empty, &state), Value::Integer(12));
}

#[test]
fn group_count_scoped_to_outer_group() {
    let mut count = GroupCountFunction::new("inner-per-outer")
        .with_group("outer")
        .counting("inner");
    let state = SimState::prepare(0);
    let empty = TestRow::empty();

    advance(&mut count, &empty, &state, ReportEventKind::ReportInitialized);
    advance_grouped(&mut count, &empty, &state, ReportEventKind::GroupStarted, Some("outer"));
    advance_grouped(&mut count, &empty, &state, ReportEventKind::GroupStarted, Some("inner"));
    advance_grouped(&mut count, &empty, &state, ReportEventKind::GroupStarted, Some("inner"));
    assert_eq!(value_of(&count, &empty, &state), Value::Integer(2));

    // Next outer instance restarts the count.
    advance_grouped(&mut count, &empty, &state, ReportEventKind::GroupStarted, Some("outer"));
    advance_grouped(&mut count, &empty, &state, ReportEventKind::GroupStarted, Some("inner"));
    assert_eq!(value_of(&count, &empty, &state), Value::Integer(1));
}

#[test]
fn page_function_counts_pages_and_honors_start_page() {
    let mut page = PageFunction::new("page").with_start_page(5);
    let state = SimState::prepare(report_model::LEVEL_PAGINATE);
    let empty = TestRow::empty();

    advance(&mut page, &empty, &state, ReportEventKind::ReportInitialized);
    advance(&mut page, &empty, &state, ReportEventKind::PageStarted);
    assert_eq!(value_of(&page, &empty, &state), Value::Integer(5));
    advance(&mut page, &empty, &state, ReportEventKind::PageStarted);
    assert_eq!(value_of(&page, &empty, &state), Value::Integer(6));
}

#[test]
fn page_function_group_reset_restarts_numbering() {
    let mut page = PageFunction::new("page").with_group("chapter");
    let state = SimState::prepare(report_model::LEVEL_PAGINATE);
    let empty = TestRow::empty();

    advance(&mut page, &empty, &state, ReportEventKind::ReportInitialized);
    advance(&mut page, &empty, &state, ReportEventKind::PageStarted);
    advance(&mut page, &empty, &state, ReportEventKind::PageStarted);
    assert_eq!(value_of(&page, &empty, &state), Value::Integer(2));

    advance_grouped(&mut page, &empty, &state, ReportEventKind::GroupStarted, Some("chapter"));
    assert_eq!(value_of(&page, &empty, &state), Value::Integer(1));
}
