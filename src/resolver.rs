use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex};

use crate::config::AppConfig;
use crate::entry_filter::{self, FilterReason, FilterVerdict};
use crate::guard::{self, GuardReason, GuardVerdict};
use crate::llm::{self, ChatApi, LlmError};
use crate::models::DictionaryEntry;
use crate::normalize;
use crate::redirect;
use crate::route::{self, RouteDecision};
use crate::typo::{TypoClassifier, TypoVerdict};

/// Tracks which query a session is currently waiting on. Every new
/// resolution bumps the epoch; a completion holding an older token is
/// dropped instead of displayed.
#[derive(Debug, Default)]
pub struct SearchSession {
    epoch: AtomicU64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == token
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("query rejected: {}", .reason.as_str())]
    Rejected { reason: GuardReason },
    #[error("entry generation failed: {0}")]
    Generation(Arc<LlmError>),
    #[error("resolution superseded by a newer query")]
    Stale,
}

#[derive(Clone, Debug)]
pub enum Resolution {
    Entry(Arc<DictionaryEntry>),
    Redirect { to: String },
    Suppressed {
        reason: FilterReason,
        note: Option<String>,
    },
}

type GenerationOutcome = Result<Arc<DictionaryEntry>, Arc<LlmError>>;

enum EntrySlot {
    Pending(watch::Receiver<Option<GenerationOutcome>>),
    Ready(Arc<DictionaryEntry>),
}

enum Gated {
    Pass(RouteDecision),
    Redirect { to: String },
    Suppressed {
        reason: FilterReason,
        note: Option<String>,
    },
}

/// Runs every gate in order and owns the one map that keeps generation
/// at most once in flight per normalized key.
#[derive(Clone)]
pub struct Resolver {
    api: Arc<dyn ChatApi>,
    typo: TypoClassifier,
    config: AppConfig,
    slots: Arc<Mutex<HashMap<String, EntrySlot>>>,
}

impl Resolver {
    pub fn new(api: Arc<dyn ChatApi>, config: AppConfig) -> Self {
        let typo = TypoClassifier::new(api.clone(), &config);
        Self {
            api,
            typo,
            config,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Search-box entry point. Decides where the query should land
    /// without generating anything.
    pub async fn resolve_query(
        &self,
        session: &SearchSession,
        raw: &str,
    ) -> Result<Resolution, ResolveError> {
        let token = session.begin();

        let gated = self.run_gates(raw).await?;
        if !session.is_current(token) {
            return Err(ResolveError::Stale);
        }

        Ok(match gated {
            Gated::Pass(route) => Resolution::Redirect {
                to: redirect::canonical_path(&route),
            },
            Gated::Redirect { to } => Resolution::Redirect { to },
            Gated::Suppressed { reason, note } => Resolution::Suppressed { reason, note },
        })
    }

    /// Entry-page entry point. `addressed` is the path the page is
    /// being served under; when it is not the canonical address the
    /// resolution is a redirect, and only a canonical address ever
    /// reaches generation.
    pub async fn resolve_entry(
        &self,
        session: &SearchSession,
        raw: &str,
        addressed: &str,
        refresh: bool,
    ) -> Result<Resolution, ResolveError> {
        let token = session.begin();

        let gated = self.run_gates(raw).await?;
        if !session.is_current(token) {
            return Err(ResolveError::Stale);
        }

        let route = match gated {
            Gated::Pass(route) => route,
            Gated::Redirect { to } => return Ok(Resolution::Redirect { to }),
            Gated::Suppressed { reason, note } => {
                return Ok(Resolution::Suppressed { reason, note })
            }
        };

        let canonical = redirect::canonical_path(&route);
        if redirect::should_redirect(addressed, &canonical) {
            return Ok(Resolution::Redirect { to: canonical });
        }

        let outcome = self.generate(&route, raw, refresh).await;
        if !session.is_current(token) {
            return Err(ResolveError::Stale);
        }

        outcome
            .map(Resolution::Entry)
            .map_err(ResolveError::Generation)
    }

    async fn run_gates(&self, raw: &str) -> Result<Gated, ResolveError> {
        let guarded = match guard::guard(raw, self.config.limits.max_query_len) {
            GuardVerdict::Ok { normalized } => normalized,
            GuardVerdict::Rejected { reason } => return Err(ResolveError::Rejected { reason }),
        };

        let normalized = if guarded.split_whitespace().nth(1).is_some() {
            normalize::normalize_lexical_unit(&guarded)
        } else {
            normalize::normalize_word(&guarded)
        };

        let filtered = match entry_filter::filter(&normalized) {
            FilterVerdict::Ok { normalized } => normalized,
            FilterVerdict::Suppressed { reason, note } => {
                tracing::debug!("{raw:?} suppressed as {}", reason.as_str());
                return Ok(Gated::Suppressed { reason, note });
            }
        };

        if let TypoVerdict::Block { reason, candidates } = self.typo.classify(&filtered).await {
            if let Some(candidate) = candidates.first() {
                let target = route::classify_route(candidate);
                tracing::debug!(
                    "{raw:?} blocked as {}, steering to {candidate:?}",
                    reason.as_str()
                );
                return Ok(Gated::Redirect {
                    to: redirect::canonical_path(&target),
                });
            }
            return Ok(Gated::Suppressed {
                reason: FilterReason::UnsafeToGenerate,
                note: Some(format!("classifier blocked: {}", reason.as_str())),
            });
        }

        Ok(Gated::Pass(route::classify_route(&filtered)))
    }

    async fn generate(
        &self,
        route: &RouteDecision,
        query: &str,
        refresh: bool,
    ) -> GenerationOutcome {
        let key = route.normalized.clone();

        let (tx, previous) = {
            let mut slots = self.slots.lock().await;

            match slots.get(&key) {
                Some(EntrySlot::Pending(rx)) => {
                    let rx = rx.clone();
                    drop(slots);
                    return await_outcome(rx).await;
                }
                Some(EntrySlot::Ready(entry)) if !refresh => {
                    return Ok(entry.clone());
                }
                _ => {}
            }

            let previous = match slots.get(&key) {
                Some(EntrySlot::Ready(entry)) => Some(entry.clone()),
                _ => None,
            };

            let (tx, rx) = watch::channel(None);
            slots.insert(key.clone(), EntrySlot::Pending(rx));
            (tx, previous)
        };

        let outcome = llm::generate_entry(self.api.as_ref(), &self.config, route, query)
            .await
            .map(Arc::new)
            .map_err(Arc::new);

        {
            let mut slots = self.slots.lock().await;
            match &outcome {
                Ok(entry) => {
                    slots.insert(key.clone(), EntrySlot::Ready(entry.clone()));
                }
                Err(err) => {
                    tracing::error!("entry generation failed for {key:?}: {err}");
                    match previous {
                        Some(entry) => {
                            slots.insert(key.clone(), EntrySlot::Ready(entry));
                        }
                        None => {
                            slots.remove(&key);
                        }
                    }
                }
            }
        }

        let _ = tx.send(Some(outcome.clone()));
        outcome
    }
}

async fn await_outcome(mut rx: watch::Receiver<Option<GenerationOutcome>>) -> GenerationOutcome {
    loop {
        if let Some(outcome) = rx.borrow().clone() {
            return outcome;
        }
        if rx.changed().await.is_err() {
            return Err(Arc::new(LlmError::Malformed(
                "generation abandoned before completion".to_string(),
            )));
        }
    }
}
