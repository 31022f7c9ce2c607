mod common;

use common::{SimState, TestRow};
use pretty_assertions::assert_eq;
use report_engine::format::row_banding;
use report_engine::{
    ExpressionRuntime, Function, ProcessingContext, ReportEvent, ReportEventKind,
};
use report_model::structure::{Section, SectionKind, StyleKey};
use report_model::{ReportConfiguration, Value};

fn deliver(function: &mut dyn Function, kind: ReportEventKind) {
    let state = SimState::output(0);
    let config = ReportConfiguration::new();
    let context = ProcessingContext::new(false, 0);
    let row = TestRow::empty();
    let runtime = ExpressionRuntime::new(&row, &config, &context);
    function
        .report_event(&ReportEvent::new(kind, &state), &runtime)
        .unwrap();
}

fn band_with_items() -> Section {
    let mut root = Section::new(SectionKind::Root, "report");
    root.add_section(Section::new(SectionKind::ItemBand, "items"));
    root.add_section(Section::new(SectionKind::ReportFooter, "footer"));
    root
}

#[test]
fn banding_alternates_item_band_visibility() {
    let mut banding = row_banding("banding", true);
    let mut root = band_with_items();

    deliver(&mut banding, ReportEventKind::ReportInitialized);
    deliver(&mut banding, ReportEventKind::ItemsAdvanced);
    banding.process_root_band(&mut root);
    assert_eq!(
        root.sections()[0].style(StyleKey::Visible),
        Some(&Value::Bool(false))
    );
    // The non-item sibling is untouched.
    assert_eq!(root.sections()[1].style(StyleKey::Visible), None);

    deliver(&mut banding, ReportEventKind::ItemsAdvanced);
    banding.process_root_band(&mut root);
    assert_eq!(
        root.sections()[0].style(StyleKey::Visible),
        Some(&Value::Bool(true))
    );
}

#[test]
fn group_start_restarts_the_stripe() {
    let mut banding = row_banding("banding", true);
    let mut root = band_with_items();

    deliver(&mut banding, ReportEventKind::ReportInitialized);
    deliver(&mut banding, ReportEventKind::ItemsAdvanced);
    deliver(&mut banding, ReportEventKind::GroupStarted);
    banding.process_root_band(&mut root);
    assert_eq!(
        root.sections()[0].style(StyleKey::Visible),
        Some(&Value::Bool(true))
    );
}

#[test]
fn walks_are_skipped_while_nothing_needs_evaluation() {
    let mut banding = row_banding("banding", true);
    // No item bands anywhere: the first walk concludes there is nothing
    // to do and later walks hit the cache.
    let mut root = Section::new(SectionKind::Root, "report");
    root.add_section(Section::new(SectionKind::ReportHeader, "header"));

    banding.process_root_band(&mut root);
    banding.process_root_band(&mut root);
    banding.process_root_band(&mut root);
    assert_eq!(banding.evaluations(), 1);
    assert_eq!(banding.skipped_evaluations(), 2);
}

#[test]
fn any_subtree_mutation_invalidates_the_cache() {
    let mut banding = row_banding("banding", true);
    let mut root = Section::new(SectionKind::Root, "report");
    root.add_section(Section::new(SectionKind::ReportHeader, "header"));

    banding.process_root_band(&mut root);
    banding.process_root_band(&mut root);
    assert_eq!(banding.skipped_evaluations(), 1);

    // A nested style write is enough; the root's own counter never moves.
    root.sections_mut()[0].set_style(StyleKey::Bold, Value::Bool(true));
    banding.process_root_band(&mut root);
    assert_eq!(banding.evaluations(), 2);
}

#[test]
fn duplicates_do_not_share_cache_entries() {
    let mut banding = row_banding("banding", true);
    let mut root = Section::new(SectionKind::Root, "report");
    root.add_section(Section::new(SectionKind::ReportHeader, "header"));

    banding.process_root_band(&mut root);
    banding.process_root_band(&mut root);
    assert_eq!(banding.skipped_evaluations(), 1);

    // The copy carries a fresh token, so the entry the original stored on
    // this band is invisible to it.
    let mut copy = banding.duplicated();
    assert_ne!(copy.token(), banding.token());
    assert_eq!(copy.evaluations(), 0);
    copy.process_root_band(&mut root);
    assert_eq!(copy.evaluations(), 1);
    assert_eq!(copy.skipped_evaluations(), 0);

    // And the original's cache entry still stands.
    banding.process_root_band(&mut root);
    assert_eq!(banding.skipped_evaluations(), 2);
}
