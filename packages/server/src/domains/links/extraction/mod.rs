pub mod url;

pub use self::url::{classify, extract_urls, is_valid_url, normalize, ExtractedUrl};
