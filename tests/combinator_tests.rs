mod support;

use lazyseq::{
    as_async, collect, concat, flat_map, flatten, from_cursor, interleave, merge, merge_with,
    range, take, yielding, zip, CursorExt, Depth, MergeConfig, MergePriority, Nested, SeqError,
};
use support::{counted, delayed, explosive, faulty, fibonacci, tracked};

fn leaf(value: i32) -> Nested<i32> {
    Nested::leaf(value)
}

fn leaves(values: &[i32]) -> Nested<i32> {
    Nested::many(values.iter().copied().map(Nested::leaf))
}

fn sample() -> Vec<Nested<i32>> {
    vec![
        leaf(1),
        Nested::many(vec![leaf(2), Nested::many(vec![leaf(3), leaves(&[4, 5])])]),
        leaf(6),
    ]
}

// ================================
// flatten / concat / flat_map
// ================================

#[tokio::test]
async fn test_flatten_one_level_by_default() {
    let result = collect(flatten(Depth::default(), sample())).await.unwrap();
    assert_eq!(
        result,
        vec![
            leaf(1),
            leaf(2),
            Nested::many(vec![leaf(3), leaves(&[4, 5])]),
            leaf(6)
        ]
    );
}

#[tokio::test]
async fn test_flatten_unbounded() {
    let result = collect(flatten(Depth::Unbounded, sample())).await.unwrap();
    let values: Vec<i32> = result.into_iter().filter_map(Nested::into_leaf).collect();
    assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_flatten_depth_zero_passes_through() {
    let result = collect(flatten(Depth::Levels(0), sample())).await.unwrap();
    assert_eq!(result, sample());
}

#[tokio::test]
async fn test_flatten_never_expands_strings() {
    let result = collect(flatten(Depth::Unbounded, vec!["ab", "cd"])).await;
    assert_eq!(result, Ok(vec!["ab", "cd"]));

    let owned = vec![String::from("hello")];
    assert_eq!(collect(flatten(3usize, owned)).await, Ok(vec![String::from("hello")]));
}

#[tokio::test]
async fn test_flatten_async_inner_sequences() {
    let slow = Nested::seq(delayed(vec![(leaf(2), 5), (leaf(3), 1)]));
    let result = collect(flatten(Depth::Unbounded, vec![leaf(1), slow, leaves(&[4])]))
        .await
        .unwrap();
    let values: Vec<i32> = result.into_iter().filter_map(Nested::into_leaf).collect();
    assert_eq!(values, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_flatten_error_terminates_stack() {
    let (root, root_probe) = tracked(vec![leaf(1), Nested::seq(from_cursor(explosive().0))]);
    let result = collect(flatten(Depth::Unbounded, from_cursor(root))).await;
    assert_eq!(result, Err(SeqError::Upstream("boom".to_string())));
    assert!(root_probe.terminated());
}

#[tokio::test]
async fn test_concat_in_order() {
    let seq = concat(vec![vec![1, 2], vec![], vec![3]]);
    assert!(seq.is_sync());
    assert_eq!(collect(seq).await, Ok(vec![1, 2, 3]));

    let result = collect(concat(vec![as_async(vec![1]), as_async(vec![2, 3])])).await;
    assert_eq!(result, Ok(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_concat_extracts_lazily() {
    let (first, first_probe) = tracked(vec![1, 2]);
    let (second, second_probe) = tracked(vec![3]);
    let mut seq = concat(vec![from_cursor(first), from_cursor(second)]);
    assert_eq!(seq.pull().await, Ok(Some(1)));
    assert_eq!(first_probe.pulls(), 1);
    assert_eq!(second_probe.pulls(), 0);
    drop(seq);
    assert!(first_probe.terminated());
    assert!(!second_probe.terminated());
}

#[tokio::test]
async fn test_flat_map() {
    let result = collect(flat_map(|n: i32| range(n), vec![1, 2, 3])).await;
    assert_eq!(result, Ok(vec![0, 0, 1, 0, 1, 2]));
}

// ================================
// interleave
// ================================

#[tokio::test]
async fn test_interleave_round_robin() {
    let seq = interleave(vec![range(3), range(2)]);
    assert!(seq.is_sync());
    assert_eq!(collect(seq).await, Ok(vec![0, 0, 1, 1, 2]));
}

#[tokio::test]
async fn test_interleave_async_sources() {
    let seq = interleave(vec![
        delayed(vec![(0, 3), (1, 3), (2, 3)]),
        delayed(vec![(0, 1), (1, 1)]),
    ]);
    assert_eq!(collect(seq).await, Ok(vec![0, 0, 1, 1, 2]));
}

#[tokio::test]
async fn test_interleave_terminates_only_started_sources() {
    let (first, first_probe) = tracked(0..);
    let (second, second_probe) = tracked(0..);
    let (third, third_probe) = tracked(0..);
    let mut seq = interleave(vec![from_cursor(first), from_cursor(second), from_cursor(third)]);
    assert_eq!(seq.pull().await, Ok(Some(0)));
    assert_eq!(seq.pull().await, Ok(Some(0)));
    drop(seq);
    assert!(first_probe.terminated());
    assert!(second_probe.terminated());
    assert_eq!(third_probe.pulls(), 0);
    assert!(!third_probe.terminated());
}

#[tokio::test]
async fn test_interleave_error_terminates_others() {
    let (healthy, healthy_probe) = tracked(0..);
    let (failing, _) = explosive();
    let seq = interleave(vec![from_cursor(healthy).boxed(), from_cursor(failing).boxed()]);
    assert_eq!(collect(seq).await, Err(SeqError::Upstream("boom".to_string())));
    assert!(healthy_probe.terminated());
}

// ================================
// merge
// ================================

#[tokio::test]
async fn test_merge_first_ready_wins() {
    let seq = merge(vec![delayed(vec![(5, 50)]), delayed(vec![(1, 10)])]);
    assert_eq!(collect(seq).await, Ok(vec![1, 5]));
}

#[tokio::test]
async fn test_merge_interleaves_by_timing() {
    let seq = merge(vec![
        delayed(vec![(0, 10), (2, 40), (4, 40)]),
        delayed(vec![(1, 30), (3, 40), (5, 40)]),
    ]);
    assert_eq!(collect(seq).await, Ok(vec![0, 1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn test_merge_same_round_prefers_input_order() {
    let seq = merge(vec![yielding(vec![0, 2]), yielding(vec![1, 3])]);
    assert_eq!(collect(seq).await, Ok(vec![0, 1, 2, 3]));
}

#[tokio::test]
async fn test_merge_rotating_priority() {
    let config = MergeConfig {
        priority: MergePriority::Rotating,
    };
    let seq = merge_with(config, vec![vec![0, 0, 0], vec![1, 1, 1]]);
    assert_eq!(collect(seq).await, Ok(vec![0, 1, 0, 1, 0, 1]));
}

#[tokio::test]
async fn test_merge_error_terminates_others() {
    let (healthy, healthy_probe) = tracked(0..);
    let (failing, failing_probe) = explosive();
    let seq = merge(vec![from_cursor(healthy).boxed(), from_cursor(failing).boxed()]);
    assert_eq!(collect(seq).await, Err(SeqError::Upstream("boom".to_string())));
    assert!(healthy_probe.terminated());
    assert_eq!(failing_probe.pulls(), 1);
}

#[tokio::test]
async fn test_merge_delivers_buffered_values_before_failure() {
    let (healthy, healthy_probe) = tracked(vec![1, 2, 3]);
    let (failing, failing_probe) = faulty(vec![100]);
    let mut seq = merge(vec![from_cursor(healthy).boxed(), from_cursor(failing).boxed()]);
    assert_eq!(seq.pull().await, Ok(Some(1)));
    assert_eq!(seq.pull().await, Ok(Some(100)));
    // The failure arrives while 2 is still queued.
    assert_eq!(seq.pull().await, Ok(Some(2)));
    assert!(healthy_probe.terminated());
    assert_eq!(seq.pull().await, Err(SeqError::Custom("fault".to_string())));
    assert_eq!(seq.pull().await, Ok(None));
    assert_eq!(healthy_probe.pulls(), 2);
    assert_eq!(failing_probe.pulls(), 2);
}

#[tokio::test]
async fn test_merge_drop_terminates_buffered_sources() {
    let (first, first_probe) = tracked(0..);
    let (second, second_probe) = tracked(10..);
    let mut seq = merge(vec![from_cursor(first), from_cursor(second)]);
    assert_eq!(seq.pull().await, Ok(Some(0)));
    // The second source already has a value waiting.
    assert_eq!(second_probe.pulls(), 1);
    drop(seq);
    assert!(first_probe.terminated());
    assert!(second_probe.terminated());
}

// ================================
// zip
// ================================

#[tokio::test]
async fn test_zip_stops_at_shorter_side() {
    let seq = zip(vec![1, 2, 3], vec!["a", "b"]);
    assert!(seq.is_sync());
    assert_eq!(collect(seq).await, Ok(vec![(1, "a"), (2, "b")]));
}

#[tokio::test]
async fn test_zip_infinite_with_finite() {
    let result = collect(zip(lazyseq::iter(fibonacci()), range(5usize))).await;
    assert_eq!(result, Ok(vec![(0, 0), (1, 1), (1, 2), (2, 3), (3, 4)]));
}

#[tokio::test]
async fn test_zip_releases_both_iterators() {
    let (numbers, numbers_probe) = counted(0..);
    let result = collect(zip(lazyseq::iter(numbers), vec!['x', 'y'])).await;
    assert_eq!(result, Ok(vec![(0, 'x'), (1, 'y')]));
    assert!(numbers_probe.dropped());
}

#[tokio::test]
async fn test_zip_terminates_both_cursors() {
    let (endless, endless_probe) = tracked(0..);
    let (short, short_probe) = tracked(vec![7]);
    let result = collect(zip(from_cursor(endless), from_cursor(short))).await;
    assert_eq!(result, Ok(vec![(0, 7)]));
    assert!(endless_probe.terminated());
    assert!(short_probe.terminated());
}

#[tokio::test]
async fn test_zip_async_sides_pair_positionally() {
    let result = collect(zip(
        delayed(vec![(1, 10), (2, 1)]),
        delayed(vec![('a', 1), ('b', 10)]),
    ))
    .await;
    assert_eq!(result, Ok(vec![(1, 'a'), (2, 'b')]));
}

#[tokio::test]
async fn test_take_over_merge_terminates_sources() {
    let (first, first_probe) = tracked(0..);
    let (second, second_probe) = tracked(100..);
    let result = collect(take(3, merge(vec![from_cursor(first), from_cursor(second)]))).await;
    assert_eq!(result, Ok(vec![0, 100, 1]));
    assert!(first_probe.terminated());
    assert!(second_probe.terminated());
}
