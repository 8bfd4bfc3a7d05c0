use lazy_static::lazy_static;
use regex::Regex;
use serde_json::error::Category;
use serde_json::Value;

use crate::error::{LLMError, LLMResult};

lazy_static! {
    static ref TRAILING_COMMA: Regex = Regex::new(r",\s*([\]}])").expect("valid regex");
}

/// Extracts the outermost JSON object from a model reply and parses it.
///
/// Everything before the first `{` and after the last `}` is dropped. A reply
/// that opens an object but never closes it gets one closing brace appended,
/// and trailing commas before `]` or `}` are removed before parsing.
pub fn trim_and_load_json(input: &str) -> LLMResult<Value> {
    let json_str = extract_object(input);
    let json_str = TRAILING_COMMA.replace_all(&json_str, "$1");

    serde_json::from_str(&json_str).map_err(|e| match e.classify() {
        Category::Syntax | Category::Eof => LLMError::InvalidJson,
        Category::Data | Category::Io => LLMError::UnexpectedParse(e.to_string()),
    })
}

fn extract_object(input: &str) -> String {
    let Some(start) = input.find('{') else {
        return String::new();
    };

    match input.rfind('}') {
        Some(end) if end > start => input[start..=end].to_string(),
        Some(_) => String::new(),
        None => format!("{}}}", &input[start..]),
    }
}
