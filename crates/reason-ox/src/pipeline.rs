//! Improve, reason, answer.
//!
//! The stages run strictly in order. The first failure aborts the run and no
//! later stage is started.

use crate::{ReasonOxError, ReasoningClient};

/// Output of a finished stage, passed to the observer of [`Pipeline::run_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage<'a> {
    /// The optimized version of the raw question
    Improved(&'a str),
    /// The reasoning trace for the improved question
    Reasoned(&'a str),
    /// The final answer
    Answered(&'a str),
}

#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    client: &'a ReasoningClient,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a ReasoningClient) -> Self {
        Self { client }
    }

    /// Run all three stages and return the final answer.
    ///
    /// # Errors
    ///
    /// The error of the first stage that failed.
    pub async fn run(&self, question: &str) -> Result<String, ReasonOxError> {
        self.run_with(question, |_| {}).await
    }

    /// Like [`Self::run`], calling `on_stage` as soon as each stage completes.
    ///
    /// The final stage answers the *raw* question, with the reasoning of the
    /// improved one as context.
    ///
    /// # Errors
    ///
    /// The error of the first stage that failed.
    pub async fn run_with<F>(&self, question: &str, mut on_stage: F) -> Result<String, ReasonOxError>
    where
        F: FnMut(Stage<'_>),
    {
        tracing::info!("improving question");
        let improved = self.client.improve_question(question).await?;
        on_stage(Stage::Improved(&improved));

        tracing::info!("generating reasoning");
        let reasoning = self.client.generate_reasoning(&improved).await?;
        on_stage(Stage::Reasoned(&reasoning));

        tracing::info!("generating final answer");
        let answer = self.client.generate_final_answer(question, &reasoning).await?;
        on_stage(Stage::Answered(&answer));

        Ok(answer)
    }
}
