/// What to do when a completion cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseErrorPolicy {
    /// Feed the parse error back as an observation; the iteration cap still
    /// bounds the turn.
    #[default]
    Reprompt,
    FailFast,
}

/// What to do when a resolved tool returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolFailurePolicy {
    #[default]
    AppendErrorAndContinue,
    FailFast,
}
