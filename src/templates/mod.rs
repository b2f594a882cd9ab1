pub mod pages;

pub use pages::{forbidden_page, server_error_page};

/// Escape a value for HTML text and attribute positions.
///
/// Covers the five characters that can break out of either context.
/// Everything user-controlled that ends up in a page goes through here.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }

    out
}
