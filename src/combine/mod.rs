//! Combinators over several producers, or over nested ones

pub mod flatten;
pub mod interleave;
pub mod merge;
pub mod zip;

pub use flatten::{concat, flat_map, flatten, Depth, Nest, Nested};
pub use interleave::interleave;
pub use merge::{merge, merge_with};
pub use zip::zip;
