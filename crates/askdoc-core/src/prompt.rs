use serde::{Deserialize, Serialize};

/// Fixed prompt template presets.
///
/// Variants differ only in wording; the placeholders are always the
/// retrieved context followed by the user's question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptProfile {
    /// Short answers, a few words at most.
    #[default]
    Concise,
    /// Wording tuned for questions over Markdown tables with numeric columns.
    TableAnalyst,
}

impl PromptProfile {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::TableAnalyst => "table-analyst",
        }
    }

    /// Merge retrieved chunk texts and the question into a single prompt.
    #[must_use]
    pub fn assemble(self, context: &[String], question: &str) -> String {
        let context = context.join("\n\n");
        match self {
            Self::Concise => format!(
                "You are a concise assistant. Based on the following context, \
                 answer the user's question with 2-3 words only.\n\n\
                 Context:\n{context}\n\n\
                 Question: {question}\n\n\
                 Answer:"
            ),
            Self::TableAnalyst => format!(
                "You are an expert in tabular data. The context below contains rows \
                 from a Markdown table; numeric columns must be used in mathematical \
                 operations, and 'Retired' means 0 for calculation purposes.\n\n\
                 Using the following structured information, answer the user's \
                 question specifically, concisely, and accurately:\n\n\
                 Table Data:\n{context}\n\n\
                 Question: {question}\n\n\
                 Answer:"
            ),
        }
    }
}

impl std::fmt::Display for PromptProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
