//! The stateful function families: running accumulators, page counters, and
//! the two-pass precomputed totals.

mod group_count;
mod item_avg;
mod item_count;
mod item_min_max;
mod item_sum;
mod page;
mod total_group_count;
mod total_group_sum;
mod total_item_min_max;
mod total_page;
mod total_support;

pub use group_count::GroupCountFunction;
pub use item_avg::ItemAvgFunction;
pub use item_count::ItemCountFunction;
pub use item_min_max::{ItemMaxFunction, ItemMinFunction};
pub use item_sum::ItemSumFunction;
pub use page::PageFunction;
pub use total_group_count::TotalGroupCountFunction;
pub use total_group_sum::TotalGroupSumFunction;
pub use total_item_min_max::{TotalItemMaxFunction, TotalItemMinFunction};
pub use total_page::{TotalPageItemCountFunction, TotalPageSumFunction};
