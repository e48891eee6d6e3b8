//! Conformance scenarios: the tester must accept faithful candidates and
//! pinpoint the first divergence of defective ones.

use std::cell::RefCell;
use std::rc::Rc;

use iterconform::*;
use test_case::test_case;
use test_helpers::*;

fn known(steps: usize) -> TesterConfig {
    TesterConfig::new(OrderMode::Determinate).with_steps(steps)
}

fn unknown(steps: usize) -> TesterConfig {
    TesterConfig::new(OrderMode::Indeterminate).with_steps(steps)
}

fn failure<T: std::fmt::Debug>(result: Result<TestSummary, TesterError<T>>) -> FailureReport<T> {
    match result {
        Ok(summary) => panic!("expected a divergence, got {}", summary),
        Err(TesterError::Diverged(report)) => *report,
        Err(err) => panic!("unexpected configuration error: {}", err),
    }
}

#[test]
fn test_catches_different_length_of_iteration() {
    let tester = IteratorTester::new(vec![1, 2, 3], known(4));
    let report = failure(tester.test(|| VecCursor::new(vec![1, 2, 3, 4])));

    let step = report.record.failed_step().expect("failed step recorded");
    assert_eq!(step.index, 3);
    assert_eq!(step.operation, Operation::ProduceNext);
    assert_eq!(step.expected, Expectation::Error(ErrorKind::Exhausted));
    assert_eq!(step.actual, Outcome::Produced(4));
    assert_eq!(
        report.violation(),
        Some(&Violation::MissingError {
            expected: ErrorKind::Exhausted
        })
    );
    assert_eq!(report.sequence_index, 0);
    assert_eq!(
        report.record.executed_prefix().to_string(),
        "[produce_next, produce_next, produce_next, produce_next]"
    );
}

#[test]
fn test_catches_shorter_iteration() {
    let tester = IteratorTester::new(vec![1, 2, 3], known(3));
    let report = failure(tester.test(|| VecCursor::new(vec![1, 2])));

    let step = report.record.failed_step().unwrap();
    assert_eq!(step.index, 2);
    assert_eq!(
        report.violation(),
        Some(&Violation::UnexpectedError {
            actual: ErrorKind::Exhausted
        })
    );
}

#[test]
fn test_catches_different_contents() {
    let tester = IteratorTester::new(vec![1, 2, 3], known(3));
    let report = failure(tester.test(|| VecCursor::new(vec![1, 3, 2])));

    let step = report.record.failed_step().unwrap();
    assert_eq!(step.index, 1);
    assert_eq!(step.expected, Expectation::Element(2));
    assert_eq!(step.actual, Outcome::Produced(3));
    assert_eq!(report.violation(), Some(&Violation::ValueMismatch));
}

#[test]
fn test_catches_different_remove_behaviour() {
    let tester = IteratorTester::new(vec![1, 2], known(3));
    let report = failure(tester.test(|| StdIter::new(vec![1, 2])));

    assert_eq!(
        report.record.failed_step().unwrap().operation,
        Operation::RemoveLast
    );
    assert_eq!(
        report.violation(),
        Some(&Violation::UnexpectedError {
            actual: ErrorKind::Unsupported
        })
    );
}

#[test]
fn test_read_only_candidate_passes_unmodifiable() {
    let config = known(3).with_features(FeatureSet::UNMODIFIABLE);
    let tester = IteratorTester::new(vec![1, 2], config);
    let summary = tester.test(|| StdIter::new(vec![1, 2])).unwrap();
    assert_eq!(summary.sequences_run, 8);
}

#[test]
fn test_unknown_order_accepts_permutation() {
    let tester = IteratorTester::new(vec![1, 2], unknown(3));
    let summary = tester.test(|| VecCursor::new(vec![2, 1])).unwrap();
    assert!(summary.sequences_run > 0);
}

#[test]
fn test_unknown_order_rejects_unrecognized_element() {
    let tester = IteratorTester::new(vec![1, 2, 50], unknown(3));
    let report = failure(tester.test(|| VecCursor::new(vec![2, 1, 3])));

    let step = report.record.failed_step().unwrap();
    assert_eq!(step.index, 2);
    assert_eq!(step.expected, Expectation::AnyOf(vec![50]));
    assert_eq!(step.actual, Outcome::Produced(3));
    assert_eq!(report.violation(), Some(&Violation::ValueMismatch));
}

#[test]
fn test_unknown_order_counts_duplicates() {
    let tester = IteratorTester::new(vec![7, 7, 8], unknown(4));
    tester.test(|| VecCursor::new(vec![7, 8, 7])).unwrap();

    let report = failure(tester.test(|| VecCursor::new(vec![7, 8, 8])));
    assert_eq!(report.violation(), Some(&Violation::ValueMismatch));
}

#[test]
fn test_catches_legacy_removal_defect_by_default() {
    let tester = IteratorTester::new(vec![1, 2], known(4));
    let report = failure(tester.test(|| LegacyRemovalDefect::new(VecCursor::new(vec![1, 2]))));

    assert_eq!(
        report.record.sequence.to_string(),
        "[produce_next, produce_next, produce_next, remove_last]"
    );
    assert_eq!(
        report.violation(),
        Some(&Violation::UnexpectedError {
            actual: ErrorKind::IllegalRemoveState
        })
    );
}

#[test]
fn test_tolerates_legacy_removal_defect_on_request() {
    let config = known(4).with_legacy_removal_tolerance(true);
    let tester = IteratorTester::new(vec![1, 2], config);
    let summary = tester
        .test(|| LegacyRemovalDefect::new(VecCursor::new(vec![1, 2])))
        .unwrap();

    assert_eq!(summary.tolerated_steps, 1);
}

#[test]
fn test_tolerance_still_rejects_other_divergences() {
    // Defect separated from the exhaustion by has_more: not the tolerated pattern
    let config = known(5).with_legacy_removal_tolerance(true);
    let tester = IteratorTester::new(vec![1, 2], config);
    let report = failure(tester.test(|| LegacyRemovalDefect::new(VecCursor::new(vec![1, 2]))));

    assert_eq!(
        report.record.sequence.to_string(),
        "[produce_next, produce_next, produce_next, has_more, remove_last]"
    );

    // Unrelated bugs are unaffected
    let tester = IteratorTester::new(vec![1, 2, 3], known(3).with_legacy_removal_tolerance(true));
    let report = failure(tester.test(|| VecCursor::new(vec![1, 3, 2])));
    assert_eq!(report.violation(), Some(&Violation::ValueMismatch));
}

#[test]
fn test_verify_gets_called_once_per_step() {
    const STEPS: usize = 3;
    let tester = IteratorTester::new(vec![1], known(STEPS));

    let mut candidates = 0;
    let mut verifications = 0;
    tester
        .test_with_invariant(
            || {
                candidates += 1;
                VecCursor::new(vec![1])
            },
            |_| {
                verifications += 1;
                Ok(())
            },
        )
        .unwrap();

    assert!(candidates > 0);
    assert_eq!(
        verifications,
        candidates * STEPS,
        "should have verified once per stimulus executed"
    );
}

#[test]
fn test_verify_can_fail_the_run() {
    let message = "Important info about why verify failed";
    let tester = IteratorTester::new(vec![1, 2, 3], known(1));
    let err = tester
        .test_with_invariant(
            || VecCursor::new(vec![1, 2, 3]),
            |_| Err(InvariantFailure::new(message)),
        )
        .unwrap_err();

    assert_eq!(
        err.violation(),
        Some(&Violation::InvariantFailed {
            message: message.to_string()
        })
    );
    assert!(err.to_string().contains(message));
}

#[test]
fn test_invariant_compares_observable_contents() {
    let current: RefCell<Option<Rc<RefCell<Vec<i32>>>>> = RefCell::new(None);
    let contents_match = |view: ExpectedElements<'_, i32>| {
        let items = current.borrow();
        let items = items.as_ref().expect("candidate created").borrow();
        if view.retained() == *items {
            Ok(())
        } else {
            Err(InvariantFailure::new(format!(
                "expected {:?}, backing list holds {:?}",
                view.retained(),
                *items
            )))
        }
    };

    let tester = IteratorTester::new(vec![1, 2, 3], known(4));
    tester
        .test_with_invariant(
            || {
                let items = Rc::new(RefCell::new(vec![1, 2, 3]));
                *current.borrow_mut() = Some(Rc::clone(&items));
                SharedCursor::new(items)
            },
            contents_match,
        )
        .unwrap();

    let report = failure(tester.test_with_invariant(
        || {
            let items = Rc::new(RefCell::new(vec![1, 2, 3]));
            *current.borrow_mut() = Some(Rc::clone(&items));
            SharedCursor::lossy(items)
        },
        contents_match,
    ));
    assert_eq!(
        report.record.failed_step().unwrap().operation,
        Operation::RemoveLast
    );
    assert!(matches!(
        report.violation(),
        Some(Violation::InvariantFailed { .. })
    ));
}

#[test]
fn test_missing_exception() {
    let tester = IteratorTester::new(Vec::<i32>::new(), known(1));
    let report = failure(tester.test(|| SilentCandidate));

    assert_eq!(
        report.violation(),
        Some(&Violation::MissingError {
            expected: ErrorKind::Exhausted
        })
    );
}

#[test]
fn test_missing_exception_on_illegal_removal() {
    let config = known(1).with_illegal_removals(true);
    let tester = IteratorTester::new(Vec::<i32>::new(), config);
    let report = failure(tester.test(|| SilentRemoval));

    assert_eq!(report.record.sequence.operations(), &[Operation::RemoveLast]);
    assert_eq!(
        report.violation(),
        Some(&Violation::MissingError {
            expected: ErrorKind::IllegalRemoveState
        })
    );
}

#[test]
fn test_unexpected_exception() {
    let tester = IteratorTester::new(vec![1], known(1));
    let report = failure(tester.test(|| ThrowingCandidate {
        error: CandidateError::illegal_remove_state(),
    }));

    assert_eq!(
        report.violation(),
        Some(&Violation::UnexpectedError {
            actual: ErrorKind::IllegalRemoveState
        })
    );
}

#[test]
fn test_similar_exception_is_accepted() {
    let config = known(1).with_illegal_removals(true);
    let tester = IteratorTester::new(Vec::<i32>::new(), config);
    let summary = tester.test(|| SubordinateErrors).unwrap();
    assert_eq!(summary.sequences_run, 3);
}

#[test]
fn test_mismatched_exception() {
    let config = known(1).with_illegal_removals(true);
    let tester = IteratorTester::new(Vec::<i32>::new(), config);
    let report = failure(tester.test(|| MismatchedErrors));

    assert_eq!(
        report.violation(),
        Some(&Violation::MismatchedKind {
            expected: ErrorKind::Exhausted,
            actual: ErrorKind::Unsupported
        })
    );
}

#[test]
fn test_mismatched_exception_on_illegal_removal() {
    let config = known(1).with_illegal_removals(true);
    let tester = IteratorTester::new(Vec::<i32>::new(), config);
    let report = failure(tester.test(|| MisreportedRemoval));

    assert_eq!(report.record.sequence.operations(), &[Operation::RemoveLast]);
    assert_eq!(
        report.violation(),
        Some(&Violation::MismatchedKind {
            expected: ErrorKind::IllegalRemoveState,
            actual: ErrorKind::InvalidArgument
        })
    );
}

#[test]
fn test_panicking_candidate_is_reported() {
    let tester = IteratorTester::new(vec![1], known(1));
    let report = failure(tester.test(|| PanickingCandidate));

    let step = report.record.failed_step().unwrap();
    assert_eq!(step.actual.error().map(CandidateError::kind), Some(ErrorKind::Panicked));
    assert!(report.to_string().contains("produce_next exploded"));
}

#[test_case(vec![] ; "empty")]
#[test_case(vec![1] ; "single")]
#[test_case(vec![1, 2, 3] ; "three")]
#[test_case(vec![4, 4, 5] ; "duplicates")]
fn test_faithful_candidate_passes_up_to_len_plus_one(contents: Vec<i32>) {
    for steps in 0..=contents.len() + 1 {
        for order in [OrderMode::Determinate, OrderMode::Indeterminate] {
            let config = TesterConfig::new(order).with_steps(steps);
            let tester = IteratorTester::new(contents.clone(), config);
            let summary = tester
                .test(|| VecCursor::new(contents.clone()))
                .unwrap_or_else(|err| panic!("steps {}: {}", steps, err));
            assert_eq!(summary.steps_executed, summary.sequences_run * steps);
        }
    }
}

#[test]
fn test_report_describes_failure() {
    let tester = IteratorTester::new(vec![1, 2, 3], known(4));
    let err = tester.test(|| VecCursor::new(vec![1, 2, 3, 4])).unwrap_err();
    let text = err.to_string();

    assert!(text.contains("sequence #1"), "{}", text);
    assert!(text.contains("expected: error exhausted"), "{}", text);
    assert!(text.contains("actual:   produced 4"), "{}", text);
    assert!(text.contains("missing exception"), "{}", text);
}
