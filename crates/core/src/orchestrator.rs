use crate::answer::AnsweringService;
use crate::models::FinalAnswer;
use crate::traits::{ChatModel, RelevanceScorer, Retriever};
use tracing::{debug, warn};

/// Scores a retrieval result by its character count: more matched text is
/// treated as more relevant. Deliberately crude; selection is observable
/// behavior, so the heuristic is kept as-is. A similarity-distance scorer
/// would slot in here without touching the coordinator's control flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLengthScorer;

impl RelevanceScorer for TextLengthScorer {
    fn score(&self, retrieved_text: &str) -> usize {
        retrieved_text.chars().count()
    }
}

/// Best candidate seen while scanning collections; held only for the
/// duration of one query.
#[derive(Debug, Clone)]
struct AnswerCandidate {
    source: String,
    text: String,
    score: usize,
}

/// Fans a query out to every collection's retriever, picks the single best
/// candidate by relevance score, and summarizes only the winner's text.
/// Holds no per-query state; the indexes behind the retrievers are read-only
/// after startup.
pub struct AnswerCoordinator<M: ChatModel, S: RelevanceScorer = TextLengthScorer> {
    retrievers: Vec<Box<dyn Retriever + Send + Sync>>,
    answerer: AnsweringService<M>,
    scorer: S,
}

impl<M: ChatModel + Send + Sync> AnswerCoordinator<M, TextLengthScorer> {
    pub fn new(
        retrievers: Vec<Box<dyn Retriever + Send + Sync>>,
        answerer: AnsweringService<M>,
    ) -> Self {
        Self {
            retrievers,
            answerer,
            scorer: TextLengthScorer,
        }
    }
}

impl<M, S> AnswerCoordinator<M, S>
where
    M: ChatModel + Send + Sync,
    S: RelevanceScorer + Send + Sync,
{
    pub fn with_scorer(
        retrievers: Vec<Box<dyn Retriever + Send + Sync>>,
        answerer: AnsweringService<M>,
        scorer: S,
    ) -> Self {
        Self {
            retrievers,
            answerer,
            scorer,
        }
    }

    /// Answers one query. Collections are visited in configured order; a
    /// failing collection is skipped for this query, a strictly greater
    /// score replaces the current best, and ties keep the earliest
    /// collection. Summarization runs once, for the winner.
    pub async fn answer(&self, query: &str) -> FinalAnswer {
        let mut best: Option<AnswerCandidate> = None;

        for retriever in &self.retrievers {
            match retriever.relevant_text(query).await {
                Ok(Some(text)) => {
                    let score = self.scorer.score(&text);
                    debug!(collection = retriever.name(), score, "retrieval candidate");

                    let replaces = best
                        .as_ref()
                        .map_or(true, |current| score > current.score);
                    if replaces {
                        best = Some(AnswerCandidate {
                            source: retriever.name().to_string(),
                            text,
                            score,
                        });
                    }
                }
                Ok(None) => {
                    debug!(collection = retriever.name(), query, "no chunks retrieved");
                }
                Err(error) => {
                    warn!(
                        collection = retriever.name(),
                        query,
                        %error,
                        "collection unavailable for this query"
                    );
                }
            }
        }

        let Some(winner) = best else {
            return FinalAnswer::NotFound;
        };

        match self.answerer.summarize(Some(&winner.text)).await {
            Ok(answer) => FinalAnswer::Answered {
                source: winner.source,
                answer,
            },
            Err(error) => {
                warn!(
                    collection = winner.source,
                    query,
                    %error,
                    "summarization failed for the winning collection"
                );
                FinalAnswer::Unavailable {
                    reason: error.to_string(),
                }
            }
        }
    }
}
