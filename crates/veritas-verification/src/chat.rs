//! Question answering over an article's knowledge graph.
//!
//! The graph is rendered as a bounded text context and handed to the LLM
//! with the question. Unlike summaries, failures here surface to the caller.

use std::sync::Arc;

use veritas_core::config::ChatConfig;
use veritas_core::errors::{VerificationError, VeritasResult};
use veritas_core::models::{ChatAnswer, KnowledgeGraph};
use veritas_core::traits::ILlmClient;
use veritas_observability::chat_span;

pub struct ChatService {
    llm: Arc<dyn ILlmClient>,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(llm: Arc<dyn ILlmClient>, config: ChatConfig) -> Self {
        Self { llm, config }
    }

    /// Answer `question` from the entities and relations in `kg`.
    ///
    /// # Errors
    /// `VerificationError::MissingField` for a blank question or an empty
    /// graph, and `LlmFailed` when the model call fails or returns nothing.
    pub fn ask(
        &self,
        kg: &KnowledgeGraph,
        article_title: &str,
        question: &str,
    ) -> VeritasResult<ChatAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(missing("question"));
        }
        if kg.is_empty() {
            return Err(missing("knowledge_graph"));
        }

        let span = chat_span!(kg.entities.len(), kg.relations.len());
        let _guard = span.enter();

        let context = graph_context(kg, article_title, &self.config);
        let reply = self
            .llm
            .generate(&chat_prompt(&context, question), self.config.temperature)
            .inspect_err(|e| tracing::warn!(error = %e, "chat generation failed"))?;

        let answer = reply.trim();
        if answer.is_empty() {
            return Err(VerificationError::LlmFailed {
                reason: "empty chat answer".into(),
            }
            .into());
        }
        tracing::debug!(answer_chars = answer.chars().count(), "chat answered");

        Ok(ChatAnswer {
            answer: answer.to_string(),
            article_title: article_title.to_string(),
        })
    }
}

fn missing(field: &str) -> veritas_core::VeritasError {
    VerificationError::MissingField {
        field: field.into(),
    }
    .into()
}

/// Render the article title, then up to `max_entities` entities and
/// `max_relations` relations, one per line.
fn graph_context(kg: &KnowledgeGraph, article_title: &str, config: &ChatConfig) -> String {
    let mut context = format!("Article: {article_title}\n\n");

    if !kg.entities.is_empty() {
        context.push_str("Entities extracted from the article:\n");
        for entity in kg.entities.iter().take(config.max_entities) {
            context.push_str(&format!("- {} ({})", entity.name, entity.entity_type));
            if !entity.context.is_empty() {
                context.push_str(&format!(": {}", entity.context));
            }
            context.push('\n');
        }
        context.push('\n');
    }

    if !kg.relations.is_empty() {
        context.push_str("Relationships identified:\n");
        for relation in kg.relations.iter().take(config.max_relations) {
            let relationship = if relation.relationship.is_empty() {
                "related"
            } else {
                relation.relationship.as_str()
            };
            context.push_str(&format!(
                "- {} → {} → {}",
                relation.source, relationship, relation.target
            ));
            if !relation.context.is_empty() {
                context.push_str(&format!(" ({})", relation.context));
            }
            context.push('\n');
        }
        context.push('\n');
    }

    context
}

fn chat_prompt(context: &str, question: &str) -> String {
    format!(
        "You are an AI assistant for analyzing news articles using knowledge graph data.\n\n\
         Use the knowledge graph information below to answer the user's question.\n\
         The knowledge graph contains the entities (people, organizations, locations, etc.) \
         extracted from the article and the relationships between them.\n\n\
         If the question cannot be answered from this information, say so clearly.\n\n\
         KNOWLEDGE GRAPH DATA:\n{context}\n\
         USER QUESTION: {question}\n\n\
         Please provide a clear, concise answer based on the knowledge graph above."
    )
}
