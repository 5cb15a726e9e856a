pub mod ai_result;
pub mod category;
pub mod event;
pub mod fetched_content;
pub mod link;
pub mod link_source;

pub use ai_result::*;
pub use category::*;
pub use event::*;
pub use fetched_content::*;
pub use link::*;
pub use link_source::*;
