use futures::executor::block_on;
use lazyseq::{
    as_async, collect, distinct, interleave, map, skip, skip_while, take, take_while, tap, zip,
    SeqResult,
};
use quickcheck::{quickcheck, TestResult};

fn pipeline_sync(xs: Vec<i16>, n: usize) -> SeqResult<Vec<i16>> {
    block_on(collect(take(
        n,
        skip_while(|x| *x < 0, distinct(map(|x: i16| x / 3, xs))),
    )))
}

fn pipeline_async(xs: Vec<i16>, n: usize) -> SeqResult<Vec<i16>> {
    block_on(collect(take(
        n,
        skip_while(|x| *x < 0, distinct(map(|x: i16| x / 3, as_async(xs)))),
    )))
}

#[test]
fn test_decorator_chain_matches_across_protocols() {
    fn prop(xs: Vec<i16>, n: u8) -> bool {
        pipeline_sync(xs.clone(), n as usize) == pipeline_async(xs, n as usize)
    }
    quickcheck(prop as fn(Vec<i16>, u8) -> bool);
}

#[test]
fn test_skip_take_while_match_across_protocols() {
    fn prop(xs: Vec<u8>, n: u8, limit: u8) -> bool {
        let sync = block_on(collect(take_while(|x| *x != limit, skip(n as usize, xs.clone()))));
        let not_sync = block_on(collect(take_while(
            |x| *x != limit,
            skip(n as usize, as_async(xs)),
        )));
        sync == not_sync
    }
    quickcheck(prop as fn(Vec<u8>, u8, u8) -> bool);
}

#[test]
fn test_tap_observes_the_same_elements() {
    fn prop(xs: Vec<i32>) -> bool {
        let mut seen_sync = Vec::new();
        let mut seen_async = Vec::new();
        let sync = block_on(collect(tap(|x| seen_sync.push(*x), xs.clone())));
        let not_sync = block_on(collect(tap(|x| seen_async.push(*x), as_async(xs.clone()))));
        sync == not_sync && seen_sync == xs && seen_async == xs
    }
    quickcheck(prop as fn(Vec<i32>) -> bool);
}

#[test]
fn test_zip_is_as_long_as_the_shorter_input() {
    fn prop(left: Vec<u8>, right: Vec<i8>) -> TestResult {
        let pairs = match block_on(collect(zip(left.clone(), as_async(right.clone())))) {
            Ok(pairs) => pairs,
            Err(_) => return TestResult::failed(),
        };
        let expected: Vec<(u8, i8)> = left.into_iter().zip(right).collect();
        TestResult::from_bool(pairs == expected)
    }
    quickcheck(prop as fn(Vec<u8>, Vec<i8>) -> TestResult);
}

#[test]
fn test_interleave_keeps_every_element() {
    fn prop(a: Vec<u16>, b: Vec<u16>, c: Vec<u16>) -> TestResult {
        if a.is_empty() && b.is_empty() && c.is_empty() {
            return TestResult::discard();
        }
        let sync = block_on(collect(interleave(vec![a.clone(), b.clone(), c.clone()])));
        let not_sync = block_on(collect(interleave(vec![
            as_async(a.clone()),
            as_async(b.clone()),
            as_async(c.clone()),
        ])));
        let mut all = match &sync {
            Ok(items) => items.clone(),
            Err(_) => return TestResult::failed(),
        };
        all.sort_unstable();
        let mut expected: Vec<u16> = a.into_iter().chain(b).chain(c).collect();
        expected.sort_unstable();
        TestResult::from_bool(sync == not_sync && all == expected)
    }
    quickcheck(prop as fn(Vec<u16>, Vec<u16>, Vec<u16>) -> TestResult);
}
