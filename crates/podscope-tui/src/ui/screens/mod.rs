mod context_select;
mod pod_list;

pub use context_select::ContextSelectScreen;
pub use pod_list::PodListScreen;
