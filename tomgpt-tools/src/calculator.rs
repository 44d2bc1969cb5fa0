use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use tomgpt_core::{LlmRequest, Tool, ToolError, Value};
use tomgpt_llm::Llm;
use tomgpt_prompt::PromptTemplate;

use crate::{evaluate, format_number, CalculatorError};

pub const CALCULATOR_NAME: &str = "Calculator";
pub const CALCULATOR_DESCRIPTION: &str = "useful for when you need to answer questions about math";

pub const LLM_MATH_TEMPLATE: &str = "Translate a math problem into a single-line arithmetic expression that a calculator can evaluate. Use the output of evaluating it to answer the question.\n\
\n\
Question: <question with math problem>\n\
```text\n\
<single line mathematical expression that solves the problem>\n\
```\n\
...evaluate(text)...\n\
```output\n\
<output of evaluating the expression>\n\
```\n\
Answer: <answer>\n\
\n\
Begin.\n\
\n\
Question: What is 37593 * 67?\n\
```text\n\
37593 * 67\n\
```\n\
...evaluate(\"37593 * 67\")...\n\
```output\n\
2518731\n\
```\n\
Answer: 2518731\n\
\n\
Question: 37593^(1/5)\n\
```text\n\
37593**(1/5)\n\
```\n\
...evaluate(\"37593**(1/5)\")...\n\
```output\n\
8.222831614237718\n\
```\n\
Answer: 8.222831614237718\n\
\n\
Question: {{question}}\n";

const OUTPUT_STOP: &str = "```output";

fn text_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)^```text(.*?)```").expect("valid regex"))
}

/// The `Calculator` tool: the model writes the expression, a local evaluator
/// computes it.
#[derive(Clone)]
pub struct LlmMathTool {
    llm: Arc<dyn Llm>,
    prompt: PromptTemplate,
}

impl LlmMathTool {
    pub fn new(llm: Arc<dyn Llm>) -> Result<Self, CalculatorError> {
        Ok(Self {
            llm,
            prompt: PromptTemplate::new(LLM_MATH_TEMPLATE)?,
        })
    }

    pub async fn run(&self, question: &str) -> Result<String, CalculatorError> {
        let vars = HashMap::from([(
            "question".to_string(),
            Value::String(question.to_string()),
        )]);
        let prompt = self.prompt.render(&vars)?;
        let request = LlmRequest::from_prompt(prompt).with_stop(vec![OUTPUT_STOP.to_string()]);
        let response = self.llm.invoke(request).await?;
        Self::process_completion(&response.content)
    }

    /// Turns the model's reply into `Answer: <value>`.
    ///
    /// A ```` ```text ```` block is evaluated locally; a reply that already
    /// carries `Answer:` is passed through.
    pub fn process_completion(completion: &str) -> Result<String, CalculatorError> {
        let text = completion.trim();
        if let Some(caps) = text_block().captures(text) {
            let expression = caps[1].trim();
            tracing::debug!(expression, "evaluating calculator expression");
            let value = evaluate(expression)?;
            return Ok(format!("Answer: {}", format_number(value)));
        }
        if text.starts_with("Answer:") {
            return Ok(text.to_string());
        }
        if let Some((_, answer)) = text.rsplit_once("Answer:") {
            return Ok(format!("Answer: {}", answer.trim()));
        }
        Err(CalculatorError::UnknownFormat(text.to_string()))
    }
}

#[async_trait]
impl Tool for LlmMathTool {
    fn name(&self) -> &str {
        CALCULATOR_NAME
    }

    fn description(&self) -> &str {
        CALCULATOR_DESCRIPTION
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        Ok(self.run(input).await?)
    }
}
