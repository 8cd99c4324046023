//! Parsing the model's URL pick and the fallback when it cannot be used.

use serde_json::Value;

/// Number of posts taken from `parsed_posts` when the model's reply is unusable.
pub const FALLBACK_URL_COUNT: usize = 3;

/// True for payloads that carry nothing to select from: absent, `null`, `{}`,
/// `[]` or a blank string.
pub fn is_empty_payload(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// First syntactically valid JSON array of strings in `text`, if any.
///
/// Every `[` is tried as the start of an array; text after the array is ignored,
/// so `The best posts are: ["http://a", "http://b"].` yields both URLs.
pub fn extract_url_array(text: &str) -> Option<Vec<String>> {
    text.char_indices()
        .filter(|(_, c)| *c == '[')
        .find_map(|(i, _)| {
            serde_json::Deserializer::from_str(&text[i..])
                .into_iter::<Vec<String>>()
                .next()
                .and_then(Result::ok)
        })
}

/// URLs of the first [`FALLBACK_URL_COUNT`] entries of `parsed_posts`, skipping
/// entries without a non-empty `url`. Empty when `parsed_posts` is absent.
pub fn fallback_urls(reddit_results: &Value) -> Vec<String> {
    reddit_results
        .get("parsed_posts")
        .and_then(Value::as_array)
        .map(|posts| {
            posts
                .iter()
                .take(FALLBACK_URL_COUNT)
                .filter_map(|post| post.get("url").and_then(Value::as_str))
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
