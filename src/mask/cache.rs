//! Process-wide cache of compiled evaluation plans.
//!
//! Keys are structural fingerprints of a composed filter plus the axis names,
//! axis lengths, and fixed-input names it was lifted over. Plans carry no
//! function bodies, so a hit evaluates exactly like a miss.
//!
//! Nothing is evicted: the map gains one entry per distinct combination of
//! filter structure, axis lengths and fixed-input names until
//! [`reset_plan_cache`] is called.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, trace};

use crate::functions::EvaluationPlan;

type PlanMap = HashMap<u64, Arc<EvaluationPlan>>;

static PLAN_CACHE: OnceLock<Mutex<PlanMap>> = OnceLock::new();

fn plans() -> &'static Mutex<PlanMap> {
    PLAN_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

pub(crate) fn get_or_compile<F>(key: u64, compile: F) -> Arc<EvaluationPlan>
where
    F: FnOnce() -> EvaluationPlan,
{
    let mut cache = plans().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(plan) = cache.get(&key) {
        trace!(key, "evaluation plan cache hit");
        return Arc::clone(plan);
    }

    debug!(key, "evaluation plan cache miss, compiling");
    let plan = Arc::new(compile());
    cache.insert(key, Arc::clone(&plan));
    plan
}

#[cfg(test)]
pub(crate) fn contains(key: u64) -> bool {
    plans()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&key)
}

/// Drops every cached plan.
///
/// The cache is unbounded. Long-running callers that build masks over many
/// different grid sizes or filter sets should call this periodically to
/// release the accumulated plans.
pub fn reset_plan_cache() {
    let mut cache = plans().lock().unwrap_or_else(PoisonError::into_inner);
    debug!(dropped = cache.len(), "resetting evaluation plan cache");
    cache.clear();
}

/// Number of cached plans.
pub fn plan_cache_len() -> usize {
    plans().lock().unwrap_or_else(PoisonError::into_inner).len()
}
