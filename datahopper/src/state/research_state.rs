//! Research state and its partial update.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channels::{FieldWrite, Reducible};
use crate::message::Message;

/// Field names as reported in merge conflicts and logs.
pub mod fields {
    pub const GOOGLE_RESULTS: &str = "google_results";
    pub const BING_RESULTS: &str = "bing_results";
    pub const REDDIT_RESULTS: &str = "reddit_results";
    pub const SELECTED_REDDIT_URLS: &str = "selected_reddit_urls";
    pub const REDDIT_POST_DATA: &str = "reddit_post_data";
    pub const GOOGLE_ANALYSIS: &str = "google_analysis";
    pub const BING_ANALYSIS: &str = "bing_analysis";
    pub const REDDIT_ANALYSIS: &str = "reddit_analysis";
    pub const FINAL_ANSWER: &str = "final_answer";
    pub const MESSAGES: &str = "messages";
}

/// State threaded through the research graph.
///
/// `user_question` is set at construction and has no counterpart in
/// [`ResearchUpdate`], so no node can change it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    pub user_question: String,
    pub google_results: Option<Value>,
    pub bing_results: Option<Value>,
    pub reddit_results: Option<Value>,
    pub selected_reddit_urls: Option<Vec<String>>,
    pub reddit_post_data: Option<Vec<Value>>,
    pub google_analysis: Option<String>,
    pub bing_analysis: Option<String>,
    pub reddit_analysis: Option<String>,
    pub final_answer: Option<String>,
    /// Conversation log; append-only.
    pub messages: Vec<Message>,
}

impl ResearchState {
    /// Initial state for `question`, with the question as the first user message.
    pub fn new(question: impl Into<String>) -> Self {
        let user_question = question.into();
        Self {
            messages: vec![Message::user(user_question.clone())],
            user_question,
            ..Default::default()
        }
    }
}

/// Partial update returned by a research node. `None` / empty means "not written".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchUpdate {
    pub google_results: Option<Value>,
    pub bing_results: Option<Value>,
    pub reddit_results: Option<Value>,
    pub selected_reddit_urls: Option<Vec<String>>,
    pub reddit_post_data: Option<Vec<Value>>,
    pub google_analysis: Option<String>,
    pub bing_analysis: Option<String>,
    pub reddit_analysis: Option<String>,
    pub final_answer: Option<String>,
    pub messages: Vec<Message>,
}

impl Reducible for ResearchState {
    type Update = ResearchUpdate;

    fn written_fields(update: &ResearchUpdate) -> Vec<FieldWrite> {
        let overwrites = [
            (fields::GOOGLE_RESULTS, update.google_results.is_some()),
            (fields::BING_RESULTS, update.bing_results.is_some()),
            (fields::REDDIT_RESULTS, update.reddit_results.is_some()),
            (
                fields::SELECTED_REDDIT_URLS,
                update.selected_reddit_urls.is_some(),
            ),
            (fields::REDDIT_POST_DATA, update.reddit_post_data.is_some()),
            (fields::GOOGLE_ANALYSIS, update.google_analysis.is_some()),
            (fields::BING_ANALYSIS, update.bing_analysis.is_some()),
            (fields::REDDIT_ANALYSIS, update.reddit_analysis.is_some()),
            (fields::FINAL_ANSWER, update.final_answer.is_some()),
        ];
        let mut written: Vec<FieldWrite> = overwrites
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(field, _)| FieldWrite::overwrite(field))
            .collect();
        if !update.messages.is_empty() {
            written.push(FieldWrite::append(fields::MESSAGES));
        }
        written
    }

    fn apply(&mut self, update: ResearchUpdate) {
        fn put<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        put(&mut self.google_results, update.google_results);
        put(&mut self.bing_results, update.bing_results);
        put(&mut self.reddit_results, update.reddit_results);
        put(&mut self.selected_reddit_urls, update.selected_reddit_urls);
        put(&mut self.reddit_post_data, update.reddit_post_data);
        put(&mut self.google_analysis, update.google_analysis);
        put(&mut self.bing_analysis, update.bing_analysis);
        put(&mut self.reddit_analysis, update.reddit_analysis);
        put(&mut self.final_answer, update.final_answer);
        self.messages.extend(update.messages);
    }
}
