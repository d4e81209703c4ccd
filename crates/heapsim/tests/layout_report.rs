//! Layout snapshots and their text rendering.

use heapsim::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn fresh_heap_reports_no_allocations() {
    let heap = FirstFitAllocator::new(1024).unwrap();
    let layout = heap.layout();

    assert_eq!(layout.free, SpanList::Spans(vec![Span { start: 0, end: 1023 }]));
    assert_eq!(layout.allocated, SpanList::Empty);
    assert_eq!(
        layout.to_string(),
        "Free\n0 - 1023\n\nAllocated\nNo allocated memory space\n"
    );
}

#[test]
fn full_heap_reports_no_free_space() {
    let mut heap = BestFitAllocator::new(8).unwrap();
    let _all = heap.allocate(8).unwrap();
    let layout = heap.layout();

    assert!(layout.free.is_empty());
    assert_eq!(layout.allocated.as_slice(), &[Span { start: 0, end: 7 }]);
    assert_eq!(
        layout.to_string(),
        "Free\nNo free memory space\n\nAllocated\n0 - 7\n"
    );
}

#[test]
fn allocated_spans_follow_issue_order() {
    let mut heap = FirstFitAllocator::new(100).unwrap();
    let a = heap.allocate(20).unwrap();
    let _b = heap.allocate(30).unwrap();
    heap.release(a).unwrap();
    let _c = heap.allocate(10).unwrap();

    let layout = heap.layout();
    assert_eq!(
        layout.allocated.as_slice(),
        &[Span { start: 20, end: 49 }, Span { start: 0, end: 9 }]
    );
    assert_eq!(
        layout.allocated_sorted(),
        vec![Span { start: 0, end: 9 }, Span { start: 20, end: 49 }]
    );
    assert_eq!(
        layout.free.as_slice(),
        &[Span { start: 10, end: 19 }, Span { start: 50, end: 99 }]
    );
    assert_eq!(layout.free.cells() + layout.allocated.cells(), 100);
}

#[cfg(feature = "serde")]
mod serde_support {
    use heapsim::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_reads_kebab_case_strategy() {
        let config: AllocatorConfig =
            serde_json::from_str(r#"{ "arena_size": 256, "strategy": "best-fit" }"#).unwrap();

        assert_eq!(config.arena_size, 256);
        assert_eq!(config.strategy, Strategy::BestFit);

        let heap = Allocator::from_config(&config).unwrap();
        assert_eq!(heap.capacity(), 256);
    }

    #[test]
    fn layout_serializes_empty_sections_explicitly() {
        let mut heap = FirstFitAllocator::new(4).unwrap();
        let _all = heap.allocate(4).unwrap();

        let json = serde_json::to_value(heap.layout()).unwrap();
        assert_eq!(json["free"], serde_json::json!("empty"));
        assert_eq!(
            json["allocated"],
            serde_json::json!({ "spans": [{ "start": 0, "end": 3 }] })
        );
    }
}
