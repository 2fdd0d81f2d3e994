//! Eligibility filtering and oracle-id deduplication.
//!
//! One strictly sequential pass in input order — "first occurrence" is only
//! well defined because this runs to completion before any fan-out, so the
//! seen-set needs no synchronization.

use std::collections::HashSet;

use crate::card::RawCard;

/// Result of the filter pass: the eligible subsequence plus per-rule drop
/// counts for the batch summary.
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub eligible: Vec<RawCard>,
    pub dropped_tokens: usize,
    pub dropped_empty: usize,
    pub dropped_duplicates: usize,
}

/// Reduce the raw batch to the ordered eligible subsequence.
///
/// Rules, applied in order per record:
/// 1. token variants are dropped unconditionally;
/// 2. records with neither rules text nor keywords are dropped;
/// 3. the first remaining record per `oracle_id` is kept, later ones
///    dropped (never merged).
///
/// A record dropped by rules 1–2 does not claim its `oracle_id` — only
/// records that reach rule 3 enter the seen-set.
pub fn filter_eligible(cards: Vec<RawCard>) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for card in cards {
        if card.is_token() {
            outcome.dropped_tokens += 1;
            continue;
        }
        if !card.has_vector_content() {
            outcome.dropped_empty += 1;
            continue;
        }
        if !seen.insert(card.oracle_id.clone()) {
            outcome.dropped_duplicates += 1;
            continue;
        }
        outcome.eligible.push(card);
    }

    outcome
}
