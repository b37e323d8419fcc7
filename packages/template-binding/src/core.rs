//! Core Types
//!
//! Security contexts describe how a bound value has to be sanitized before it
//! reaches the rendered document.

use serde::{Deserialize, Serialize};

/// The classifier sorts contexts by discriminant and picks the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SecurityContext {
    #[default]
    NONE = 0,
    HTML = 1,
    STYLE = 2,
    SCRIPT = 3,
    URL = 4,
    ResourceUrl = 5,
}

impl std::fmt::Display for SecurityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SecurityContext::NONE => "none",
            SecurityContext::HTML => "html",
            SecurityContext::STYLE => "style",
            SecurityContext::SCRIPT => "script",
            SecurityContext::URL => "url",
            SecurityContext::ResourceUrl => "resource url",
        };
        f.write_str(name)
    }
}
