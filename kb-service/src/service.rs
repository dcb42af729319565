//! KnowledgeService: owns the store, the embedding engine, and the gate, and
//! exposes the operations the helpdesk CRUD layer calls.
//!
//! Every request is independent. The only state shared between requests is
//! the degradation log, kept behind a `Mutex`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use kb_core::automation::{EngineEvent, TemplateField, TemplateFields};
use kb_core::constants::VERSION;
use kb_core::errors::{KbError, KbResult};
use kb_core::models::{
    DailyFeedbackStat, DegradationEvent, Dialog, NewDialog, Rating, ResolvedCase, UsageVote,
};
use kb_core::text;
use kb_core::traits::{IDialogStore, IEmbeddingProvider, ISolutionStore};
use kb_core::KbConfig;
use kb_embeddings::{backfill_missing, BackfillReport, EmbeddingEngine};
use kb_learning::{DialogRecorder, FeedbackAdapter, FeedbackOutcome, RecordOutcome};
use kb_observability::tracing_setup::events;
use kb_observability::{DegradationTracker, TrackedDegradation};
use kb_retrieval::{
    percent, AutoAnswerDecision, ConfidenceGate, GateOutcome, RankedDialog, SearchOptions,
    SimilaritySearch,
};
use kb_solutions::{RecommendRequest, ScoredSolution, SolutionRecommender};
use kb_storage::StorageEngine;

use crate::automation::plan_actions;
use crate::plan::{AnswerContext, AnswerPlan, AnswerRoute, PlannedAction, SearchRequest};

const EMBEDDING_COMPONENT: &str = "embedding";
const KEYWORD_FALLBACK: &str = "keyword_solutions";

pub struct KnowledgeService<S = StorageEngine> {
    store: S,
    embeddings: EmbeddingEngine,
    gate: ConfidenceGate,
    degradations: Mutex<DegradationTracker>,
    config: KbConfig,
}

impl KnowledgeService<StorageEngine> {
    /// Open the configured database and embedding provider.
    pub fn open(config: KbConfig) -> KbResult<Self> {
        config.validate()?;
        let store = StorageEngine::open_with_config(&config.storage)?;
        let embeddings = EmbeddingEngine::from_config(&config.embedding)?;
        Ok(Self::with_engine(config, store, embeddings))
    }

    /// Open a database file, overriding `storage.db_path`.
    pub fn open_at(mut config: KbConfig, path: &Path) -> KbResult<Self> {
        config.storage.db_path = path.to_string_lossy().into_owned();
        Self::open(config)
    }

    /// In-memory database with an injected provider.
    pub fn in_memory(config: KbConfig, provider: Box<dyn IEmbeddingProvider>) -> KbResult<Self> {
        config.validate()?;
        let store = StorageEngine::open_in_memory()?;
        Ok(Self::new(config, store, provider))
    }
}

impl<S> KnowledgeService<S>
where
    S: IDialogStore + ISolutionStore,
{
    /// Wrap an injected store and provider. The provider is placed behind the
    /// embedding engine so sanitization, caching, and dimension checks apply.
    pub fn new(config: KbConfig, store: S, provider: Box<dyn IEmbeddingProvider>) -> Self {
        let embeddings = EmbeddingEngine::new(&config.embedding, provider);
        Self::with_engine(config, store, embeddings)
    }

    pub fn with_engine(config: KbConfig, store: S, embeddings: EmbeddingEngine) -> Self {
        info!(
            version = VERSION,
            provider = embeddings.provider_name(),
            automation_rules = config.automation.len(),
            "KnowledgeService initialized"
        );
        Self {
            store,
            embeddings,
            gate: ConfidenceGate::new(config.gate.clone()),
            degradations: Mutex::new(DegradationTracker::new()),
            config,
        }
    }

    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Retrieval ──────────────────────────────────────────────────────

    /// Dialogs similar to `question`, best first.
    pub fn search(&self, question: &str, req: &SearchRequest) -> KbResult<Vec<RankedDialog>> {
        text::validate_question(question)?;
        let opts = self.search_options(req);
        let _span = kb_observability::search_span!(opts.limit, opts.category.as_deref()).entered();
        opts.validate()?;

        let query = self.embed_query(question)?;
        SimilaritySearch::new(&self.store).search(&query, &opts)
    }

    /// Gate decision for the best match of `question`.
    pub fn can_auto_answer(&self, question: &str) -> KbResult<AutoAnswerDecision> {
        text::validate_question(question)?;
        let _span = kb_observability::gate_span!(question.chars().count()).entered();

        let query = self.embed_query(question)?;
        self.gate.decide(&self.store, &query)
    }

    /// Route an incoming question: auto-answer, suggest to an agent, or
    /// escalate. Falls back to keyword-scored solutions when the embedding
    /// provider fails.
    pub fn answer_question(&self, question: &str, ctx: &AnswerContext) -> KbResult<AnswerPlan> {
        text::validate_question(question)?;
        let _span = kb_observability::gate_span!(question.chars().count()).entered();

        let query = match self.embed_query(question) {
            Ok(query) => query,
            Err(e) if e.is_embedding_failure() => return self.keyword_fallback(question, ctx, &e),
            Err(e) => return Err(e),
        };

        let decision = self.gate.decide(&self.store, &query)?;
        let (route, event, solutions) = match (decision.outcome, decision.dialog_id.as_deref()) {
            (GateOutcome::AutoAnswer, Some(id)) => {
                self.store.mark_used(id)?;
                events::auto_answered(id, decision.confidence);
                let event = EngineEvent::AutoAnswered {
                    dialog_id: id.to_string(),
                    similarity: decision.confidence,
                };
                (AnswerRoute::AutoAnswer, event, Vec::new())
            }
            (GateOutcome::Suggest, Some(id)) => {
                let event = EngineEvent::SuggestedToAgent {
                    dialog_id: id.to_string(),
                    similarity: decision.confidence,
                };
                (AnswerRoute::SuggestToAgent, event, Vec::new())
            }
            _ => {
                events::escalated(&decision.reason);
                let event = EngineEvent::Escalated {
                    reason: decision.reason.clone(),
                };
                (AnswerRoute::Escalate, event, self.escalation_solutions(question, ctx))
            }
        };

        let fields = self
            .template_fields(question, ctx)
            .set(TemplateField::Confidence, decision.confidence_percent.clone());
        let fields = match &decision.dialog_id {
            Some(id) => fields.set(TemplateField::DialogId, id.clone()),
            None => fields,
        };
        let actions = plan_actions(&self.config.automation, &event, &fields);

        Ok(AnswerPlan {
            route,
            decision: Some(decision),
            solutions,
            actions,
        })
    }

    fn keyword_fallback(
        &self,
        question: &str,
        ctx: &AnswerContext,
        cause: &KbError,
    ) -> KbResult<AnswerPlan> {
        self.tracker().record(DegradationEvent {
            component: EMBEDDING_COMPONENT.to_string(),
            failure: cause.to_string(),
            fallback_used: KEYWORD_FALLBACK.to_string(),
            timestamp: Utc::now(),
        });

        let solutions = self.recommend_solutions(question, &self.recommend_request(ctx))?;
        let event = EngineEvent::KeywordFallback {
            solution_count: solutions.len(),
        };
        let confidence = solutions
            .first()
            .map(|s| format!("{}%", s.confidence))
            .unwrap_or_else(|| percent(0.0));
        let fields = self
            .template_fields(question, ctx)
            .set(TemplateField::Confidence, confidence);
        let actions = plan_actions(&self.config.automation, &event, &fields);

        Ok(AnswerPlan {
            route: AnswerRoute::KeywordFallback,
            decision: None,
            solutions,
            actions,
        })
    }

    /// Solutions attached to an escalation. Scoring problems are logged, not
    /// returned, since the escalation itself already succeeded.
    fn escalation_solutions(&self, question: &str, ctx: &AnswerContext) -> Vec<ScoredSolution> {
        match self.recommend_solutions(question, &self.recommend_request(ctx)) {
            Ok(solutions) => solutions,
            Err(e) => {
                warn!(error = %e, "solutions for escalation unavailable");
                Vec::new()
            }
        }
    }

    fn embed_query(&self, question: &str) -> KbResult<Vec<f32>> {
        let _span = kb_observability::embedding_span!(
            self.embeddings.provider_name(),
            self.embeddings.dimensions()
        )
        .entered();
        let query = self.embeddings.embed(question)?;
        let mut tracker = self.tracker();
        if tracker.is_degraded(EMBEDDING_COMPONENT) {
            tracker.mark_recovered(EMBEDDING_COMPONENT);
        }
        Ok(query)
    }

    fn search_options(&self, req: &SearchRequest) -> SearchOptions {
        let mut opts = SearchOptions::from_config(&self.config.retrieval);
        if let Some(limit) = req.limit {
            opts.limit = limit;
        }
        if let Some(min) = req.min_similarity {
            opts.min_similarity = min;
        }
        if let Some(helpful_only) = req.helpful_only {
            opts.helpful_only = helpful_only;
        }
        opts.category = req.category.clone();
        opts
    }

    fn recommend_request(&self, ctx: &AnswerContext) -> RecommendRequest {
        RecommendRequest {
            category: ctx.category.clone(),
            limit: None,
        }
    }

    fn template_fields(&self, question: &str, ctx: &AnswerContext) -> TemplateFields {
        let mut fields = TemplateFields::new().set(TemplateField::Question, question);
        let optional = [
            (TemplateField::Category, &ctx.category),
            (TemplateField::Company, &ctx.company),
            (TemplateField::Lead, &ctx.lead),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                fields = fields.set(field, v.clone());
            }
        }
        fields
    }

    // ── Feedback ───────────────────────────────────────────────────────

    pub fn submit_feedback(
        &self,
        dialog_id: &str,
        rating: Rating,
        comment: Option<String>,
    ) -> KbResult<FeedbackOutcome> {
        let _span = kb_observability::feedback_span!(dialog_id, rating.as_str()).entered();
        FeedbackAdapter::new(&self.store, self.config.feedback.clone())
            .apply_feedback(dialog_id, rating, comment)
    }

    /// Automation actions for a processed feedback event.
    pub fn feedback_actions(&self, outcome: &FeedbackOutcome) -> Vec<PlannedAction> {
        let event = EngineEvent::FeedbackReceived {
            dialog_id: outcome.dialog.id.clone(),
            rating: outcome.feedback.rating,
            requires_review: outcome.dialog.requires_human_review,
        };
        let fields = TemplateFields::new()
            .set(TemplateField::Question, outcome.dialog.question_text.clone())
            .set(TemplateField::DialogId, outcome.dialog.id.clone())
            .set(
                TemplateField::Confidence,
                percent(outcome.dialog.confidence_score.value()),
            );
        let fields = match &outcome.dialog.question_category {
            Some(c) => fields.set(TemplateField::Category, c.clone()),
            None => fields,
        };
        plan_actions(&self.config.automation, &event, &fields)
    }

    pub fn daily_feedback_stats(&self, date: NaiveDate) -> KbResult<Vec<DailyFeedbackStat>> {
        self.store.daily_feedback_stats(date)
    }

    pub fn dialogs_requiring_review(&self, limit: usize) -> KbResult<Vec<Dialog>> {
        self.store.dialogs_requiring_review(limit)
    }

    // ── Solutions ──────────────────────────────────────────────────────

    pub fn recommend_solutions(
        &self,
        problem: &str,
        req: &RecommendRequest,
    ) -> KbResult<Vec<ScoredSolution>> {
        let _span = kb_observability::solutions_span!(req.category.as_deref()).entered();
        SolutionRecommender::new(&self.store, self.config.solutions.clone()).recommend(problem, req)
    }

    pub fn record_solution_usage(&self, solution_id: &str, vote: UsageVote) -> KbResult<()> {
        SolutionRecommender::new(&self.store, self.config.solutions.clone())
            .record_usage(solution_id, vote)
    }

    // ── Corpus maintenance ─────────────────────────────────────────────

    pub fn record_dialog(&self, new: &NewDialog) -> KbResult<RecordOutcome> {
        DialogRecorder::new(&self.store, &self.embeddings).record(new)
    }

    pub fn record_from_case(&self, case: &ResolvedCase) -> KbResult<RecordOutcome> {
        DialogRecorder::new(&self.store, &self.embeddings).record_from_case(case)
    }

    pub fn deactivate_dialog(&self, dialog_id: &str) -> KbResult<()> {
        DialogRecorder::new(&self.store, &self.embeddings).deactivate(dialog_id)
    }

    pub fn expire_dialog(&self, dialog_id: &str, at: Option<DateTime<Utc>>) -> KbResult<()> {
        DialogRecorder::new(&self.store, &self.embeddings).expire(dialog_id, at)
    }

    /// Embed dialogs stored while the provider was down.
    pub fn backfill_embeddings(&self, batch_size: usize) -> KbResult<BackfillReport> {
        let report = backfill_missing(&self.store, &self.embeddings, batch_size)?;
        debug!(?report, "backfill finished");
        if report.embedded > 0 {
            self.tracker().mark_recovered(EMBEDDING_COMPONENT);
        }
        Ok(report)
    }

    // ── Observability ──────────────────────────────────────────────────

    /// Snapshot of recorded degradation episodes, oldest first.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.tracker().events().to_vec()
    }

    pub fn is_degraded(&self) -> bool {
        self.tracker().is_degraded(EMBEDDING_COMPONENT)
    }

    fn tracker(&self) -> MutexGuard<'_, DegradationTracker> {
        self.degradations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
