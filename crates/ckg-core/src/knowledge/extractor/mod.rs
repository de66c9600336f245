//! Source extraction: locating a function, deriving its signature, headers
//! and outgoing calls.

mod calls;
mod headers;
mod locator;
mod patterns;
mod signature;

pub use calls::{
    extract_calls, without_definition, CallExtractor, ExtractorCapability, RegexCallExtractor,
};
pub use headers::{extract_headers, headers_in};
pub use locator::{read_source, SourceLocator};
pub use patterns::{CALL_KEYWORDS, CALL_PATTERN};
pub use signature::{definition_line, extract_signature, extract_signature_with_limit};
