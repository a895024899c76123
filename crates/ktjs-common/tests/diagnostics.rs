use super::*;

#[test]
fn bag_counts_errors_and_warnings_separately() {
    let mut bag = DiagnosticBag::with_file("main.kt");
    bag.warning(Span::new(10, 20), "unreachable", 1001);
    bag.error(Span::new(0, 4), "unresolved", 1002);
    bag.info(Span::new(5, 6), "kept call", 1004);

    assert_eq!(bag.len(), 3);
    assert_eq!(bag.error_count(), 1);
    assert_eq!(bag.warning_count(), 1);
    assert!(bag.has_errors());
    assert_eq!(bag.codes(), vec![1001, 1002, 1004]);
    assert!(bag.iter().all(|d| d.file_name == "main.kt"));
}

#[test]
fn sort_orders_by_position_within_file() {
    let mut bag = DiagnosticBag::with_file("a.kt");
    bag.warning(Span::new(30, 31), "second", 1);
    bag.warning(Span::new(3, 4), "first", 2);
    bag.sort();
    assert_eq!(bag.codes(), vec![2, 1]);
}

#[test]
fn take_resets_counts() {
    let mut bag = DiagnosticBag::new();
    bag.error(Span::dummy(), "boom", 7);
    let taken = bag.take();
    assert_eq!(taken.len(), 1);
    assert!(bag.is_empty());
    assert!(!bag.has_errors());
}

#[test]
fn merge_keeps_counts_consistent() {
    let mut first = DiagnosticBag::new();
    first.warning(Span::dummy(), "w", 1);
    let mut second = DiagnosticBag::new();
    second.error(Span::dummy(), "e", 2);
    first.merge(second);
    assert_eq!(first.warning_count(), 1);
    assert_eq!(first.error_count(), 1);
}

#[test]
fn format_includes_code_and_location() {
    let diag = Diagnostic::warning("main.kt", Span::new(12, 40), "Unreachable catch clause", 1001);
    assert_eq!(
        diag.format_simple(),
        "warning[KJS1001]: Unreachable catch clause"
    );
    assert_eq!(
        diag.format(),
        "main.kt(12..40): warning KJS1001: Unreachable catch clause"
    );
    assert_eq!(diag.to_string(), diag.format_simple());
}

#[test]
fn span_never_inverts() {
    let span = Span::new(10, 3);
    assert_eq!(span.len(), 0);
    assert!(span.is_empty());
    assert_eq!(Span::new(2, 5).merge(Span::new(4, 9)), Span::new(2, 9));
}
