//! Property tests for arena invariants under random allocate/release
//! sequences.

use heapsim::{Allocator, AllocatorConfig, FirstFitAllocator, FreeRegion, Handle, HeapError};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    /// Releases the live handle at this position (modulo live count)
    Release(usize),
    /// Releases a handle that was already released, if any
    ReleaseStale(usize),
}

fn operation() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1usize..48).prop_map(Op::Allocate),
        2 => any::<usize>().prop_map(Op::Release),
        1 => any::<usize>().prop_map(Op::ReleaseStale),
    ]
}

fn placement() -> impl Strategy<Value = heapsim::Strategy> {
    prop_oneof![
        Just(heapsim::Strategy::FirstFit),
        Just(heapsim::Strategy::BestFit)
    ]
}

/// Address the policy must pick for `size`, computed independently from the
/// free list snapshot.
fn expected_address(
    policy: heapsim::Strategy,
    free: &[FreeRegion],
    size: usize,
) -> Option<usize> {
    let mut candidates = free.iter().filter(|region| region.length >= size);
    match policy {
        heapsim::Strategy::FirstFit => candidates.next().map(|region| region.address),
        heapsim::Strategy::BestFit => candidates
            .min_by_key(|region| (region.length, region.address))
            .map(|region| region.address),
    }
}

fn assert_invariants(heap: &Allocator) -> Result<(), TestCaseError> {
    prop_assert!(heap.verify().is_ok(), "{:?}", heap.verify());
    prop_assert_eq!(heap.free_cells() + heap.allocated_cells(), heap.capacity());

    let free = heap.free_regions().as_slice();
    for pair in free.windows(2) {
        prop_assert!(pair[0].end() < pair[1].address);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn invariants_hold_after_every_operation(
        capacity in 1usize..512,
        policy in placement(),
        ops in proptest::collection::vec(operation(), 1..120),
    ) {
        let config = AllocatorConfig::new(capacity).with_strategy(policy);
        let mut heap = Allocator::from_config(&config).unwrap();
        let mut live: Vec<Handle> = Vec::new();
        let mut released: Vec<Handle> = Vec::new();

        for op in ops {
            match op {
                Op::Allocate(size) => {
                    let snapshot = heap.free_regions().as_slice().to_vec();
                    let expected = expected_address(policy, &snapshot, size);

                    match heap.allocate(size) {
                        Ok(handle) => {
                            prop_assert_eq!(heap.address_of(handle), expected);
                            live.push(handle);
                        }
                        Err(HeapError::OutOfMemory { .. }) => {
                            prop_assert_eq!(expected, None);
                            prop_assert_eq!(heap.free_regions().as_slice(), snapshot.as_slice());
                        }
                        Err(other) => {
                            return Err(TestCaseError::fail(format!("unexpected error: {other}")));
                        }
                    }
                }
                Op::Release(pick) => {
                    if live.is_empty() {
                        continue;
                    }
                    let handle = live.swap_remove(pick % live.len());
                    prop_assert!(heap.release(handle).is_ok());
                    released.push(handle);
                }
                Op::ReleaseStale(pick) => {
                    if released.is_empty() {
                        continue;
                    }
                    let handle = released[pick % released.len()];
                    let before = heap.layout();
                    let is_invalid = matches!(
                        heap.release(handle),
                        Err(HeapError::InvalidHandle { .. })
                    );
                    prop_assert!(is_invalid);
                    prop_assert_eq!(heap.layout(), before);
                }
            }
            assert_invariants(&heap)?;
        }

        for handle in live {
            prop_assert!(heap.release(handle).is_ok());
            assert_invariants(&heap)?;
        }
        prop_assert_eq!(
            heap.free_regions().as_slice(),
            &[FreeRegion::new(0, capacity)][..]
        );
    }

    #[test]
    fn free_list_from_any_release_order_is_coalesced(
        sizes in proptest::collection::vec(1usize..16, 1..40),
        order in proptest::collection::vec(any::<usize>(), 40),
    ) {
        let capacity: usize = sizes.iter().sum();
        let mut heap = FirstFitAllocator::new(capacity).unwrap();
        let mut handles: Vec<Handle> = sizes
            .iter()
            .map(|&size| heap.allocate(size).unwrap())
            .collect();
        prop_assert!(heap.free_regions().is_empty());

        let mut picks = order.into_iter();
        while !handles.is_empty() {
            let pick = picks.next().unwrap_or(0) % handles.len();
            let handle = handles.swap_remove(pick);
            heap.release(handle).unwrap();

            let free = heap.free_regions();
            prop_assert!(free.check(capacity).is_ok());
        }
        prop_assert_eq!(heap.free_regions().len(), 1);
    }
}
