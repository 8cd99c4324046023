//! Prompt builders for the research nodes.
//!
//! Each builder turns the state fields a node reads into a system/user pair.
//! Structured payloads are embedded as pretty-printed JSON.

use serde_json::Value;

/// System and user prompt for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "(no results)".to_string(),
        Some(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
    }
}

fn render_text(text: Option<&str>) -> &str {
    match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => "(no analysis available)",
    }
}

/// Asks the model to pick the Reddit threads worth reading.
pub fn reddit_url_selection(question: &str, reddit_results: &Value) -> PromptPair {
    PromptPair {
        system: "You are a research assistant selecting Reddit discussions. Choose the posts \
                 most likely to contain first-hand, useful information for the user's question. \
                 Select at most five."
            .to_string(),
        user: format!(
            "User question: {}\n\nReddit search results:\n{}\n\n\
             Respond with a JSON array of the selected post URLs, like: [\"url1\", \"url2\"]",
            question,
            render(Some(reddit_results))
        ),
    }
}

/// Analysis of Google organic results.
pub fn google_analysis(question: &str, results: Option<&Value>) -> PromptPair {
    web_analysis("Google", question, results)
}

/// Analysis of Bing organic results.
pub fn bing_analysis(question: &str, results: Option<&Value>) -> PromptPair {
    web_analysis("Bing", question, results)
}

fn web_analysis(engine: &str, question: &str, results: Option<&Value>) -> PromptPair {
    PromptPair {
        system: format!(
            "You analyze {} search results. Extract the facts relevant to the user's question, \
             note which sources they come from, and flag anything contradictory or outdated.",
            engine
        ),
        user: format!(
            "User question: {}\n\n{} search results:\n{}\n\nProvide a concise analysis.",
            question,
            engine,
            render(results)
        ),
    }
}

/// Analysis of Reddit search results plus retrieved threads.
pub fn reddit_analysis(
    question: &str,
    reddit_results: Option<&Value>,
    post_data: Option<&[Value]>,
) -> PromptPair {
    let posts = match post_data {
        Some(posts) if !posts.is_empty() => render(Some(&Value::Array(posts.to_vec()))),
        _ => "(no threads retrieved)".to_string(),
    };
    PromptPair {
        system: "You analyze Reddit discussions. Summarize community opinions, recurring \
                 recommendations and notable disagreements, and distinguish experience from \
                 speculation."
            .to_string(),
        user: format!(
            "User question: {}\n\nReddit search results:\n{}\n\nRetrieved threads:\n{}\n\n\
             Provide a concise analysis.",
            question,
            render(reddit_results),
            posts
        ),
    }
}

/// Final answer combining the three analyses.
pub fn synthesis(
    question: &str,
    google: Option<&str>,
    bing: Option<&str>,
    reddit: Option<&str>,
) -> PromptPair {
    PromptPair {
        system: "You combine several research analyses into one clear, well-structured answer. \
                 Prefer claims supported by more than one source and mention real-world \
                 experience from Reddit where relevant."
            .to_string(),
        user: format!(
            "User question: {}\n\nGoogle analysis:\n{}\n\nBing analysis:\n{}\n\n\
             Reddit analysis:\n{}\n\nWrite the final answer.",
            question,
            render_text(google),
            render_text(bing),
            render_text(reddit)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_selection_prompt_embeds_results_and_format_hint() {
        let p = reddit_url_selection("q?", &json!({"parsed_posts": [{"url": "https://r/1"}]}));
        assert!(p.user.contains("q?"));
        assert!(p.user.contains("https://r/1"));
        assert!(p.user.contains("JSON array"));
    }

    #[test]
    fn synthesis_prompt_marks_missing_analyses() {
        let p = synthesis("q", Some("g"), None, Some("  "));
        assert!(p.user.contains("Google analysis:\ng"));
        assert_eq!(p.user.matches("(no analysis available)").count(), 2);
    }

    #[test]
    fn reddit_prompt_without_posts() {
        let p = reddit_analysis("q", None, Some(&[]));
        assert!(p.user.contains("(no results)"));
        assert!(p.user.contains("(no threads retrieved)"));
    }
}
