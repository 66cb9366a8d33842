//! Cross-cutting utilities (C8, §4.8): tolerance-based matching, range bookkeeping,
//! unique-id indexing, ion-mobility filtering, and sequence tagging.

mod matched_iterator;
mod mobility;
mod range;
mod tagger;
mod tolerance;
mod unique_id;

pub use matched_iterator::MatchedIterator;
pub use mobility::{passes_mobility_filter, RangeMobility};
pub use range::{PeakIndex, Range1D, RangeManager};
pub use tagger::{extract_tags, Tag, TaggerConfig};
pub use tolerance::{Tolerance, WithinTolerance};
pub use unique_id::{is_valid_unique_id, UniqueIdIndexer, UniqueIdInterface};
