use boltbot_core::format::POST_CHAR_LIMIT;

/// Line that separates one post of the thread from the next.
pub const SEGMENT_DELIMITER: &str = "---";

pub const DEFAULT_SUBJECT: &str = "a defining moment in Chargers franchise history";

/// Prompt for an unnumbered thread with a delimiter line between posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadPrompt {
    pub subject: String,
    pub min_segments: usize,
    pub max_segments: usize,
    pub char_limit: usize,
}

impl ThreadPrompt {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            min_segments: 8,
            max_segments: 12,
            char_limit: POST_CHAR_LIMIT,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Write a thread of {min} to {max} posts telling the story of {subject}.\n\
             \n\
             Rules:\n\
             - Only state facts you are certain of: real names, dates, scores and statistics. \
             If you are unsure of a detail, leave it out rather than guessing.\n\
             - Each post must be at most {limit} characters.\n\
             - Tell the story in order. The first post sets the scene and the last one closes it.\n\
             - Do not number the posts.\n\
             - Separate posts with a line containing only {delimiter}.\n\
             - Output only the posts and the separators.",
            min = self.min_segments,
            max = self.max_segments,
            subject = self.subject,
            limit = self.char_limit,
            delimiter = SEGMENT_DELIMITER,
        )
    }
}

impl Default for ThreadPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT)
    }
}
