pub mod error;
pub mod configuration;

pub mod cursor;
pub mod producer;
pub mod source;

pub mod decorator;
pub mod transform;
pub mod suspending;
pub mod combine;
pub mod consume;

pub use error::{SeqError, SeqResult};
pub use configuration::{CollectConfig, MergeConfig, MergePriority};
pub use cursor::{Cursor, CursorExt, IterCursor};
pub use producer::{
    detect, extract, AsyncSeq, BoxSeq, Capabilities, Mode, Producer, Seq, SeqOf, SyncSeq,
};
pub use source::{
    as_async, from_cursor, from_stream, from_try_stream, iter, range, range_from, range_step,
    repeat, yielding, Stepped,
};
pub use transform::{
    distinct, distinct_by, filter, map, skip, skip_while, take, take_while, tap, SameValueZero,
};
pub use suspending::{filter_async, map_async, skip_while_async, take_while_async, tap_async};
pub use combine::{
    concat, flat_map, flatten, interleave, merge, merge_with, zip, Depth, Nest, Nested,
};
pub use consume::{
    collect, collect_with, every, every_async, find, find_async, fold, fold_async, includes,
    reduce, some, some_async, sum,
};
