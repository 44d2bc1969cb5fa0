use clap::ValueEnum;

const BASE_GREETING: &str = "In this version, I would think, act (search or calculate) and observe step by step until coming up with a final answer. Anything I can help?";

const RAG_GREETING: &str = "In this version, if you ask me questions about Kyudo, I would check the Kyudo Manual Volume 1 in Japanese before answering. Otherwise I would think, act (search or calculate) and observe step by step until coming up with a final answer. Anything I can help?";

/// Which front-end to run: plain search and math, or with Kyudo manual
/// retrieval on top.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    #[default]
    Base,
    Rag,
}

impl Variant {
    /// System message every session of this variant starts with.
    pub fn greeting(&self) -> &'static str {
        match self {
            Variant::Base => BASE_GREETING,
            Variant::Rag => RAG_GREETING,
        }
    }

    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            Variant::Base => &["Search", "Calculator"],
            Variant::Rag => &["Search", "Calculator", "Document"],
        }
    }

    pub fn needs_retrieval(&self) -> bool {
        matches!(self, Variant::Rag)
    }
}
