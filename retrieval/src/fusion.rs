use hybrid_rag_core::{SearchResult, sort_by_score_desc};
use indexmap::IndexMap;
use indexmap::map::Entry;
use log::debug;

/// RRF smoothing constant (higher = less emphasis on top results)
pub const RRF_K: f32 = 60.0;

/// Weighted Reciprocal Rank Fusion.
///
/// RRF(d) = Σ w_i / (k + rank_i(d)), rank 1-based, summed over every list
/// that contains d. Each document keeps the document copy and `source` of the
/// first list that introduced it, so pass lists in priority order (dense
/// before sparse). A zero-weight list adds nothing to any score but still
/// introduces its documents, at score 0 for documents no other list has. The
/// output is sorted by fused score descending; ties stay in first-seen order.
pub fn reciprocal_rank_fusion(ranked_lists: Vec<(Vec<SearchResult>, f32)>) -> Vec<SearchResult> {
    let mut fused: IndexMap<String, SearchResult> = IndexMap::new();

    for (list_index, (results, weight)) in ranked_lists.into_iter().enumerate() {
        debug!("RRF: list {list_index} with {} results, weight {weight}", results.len());

        for (rank, result) in results.into_iter().enumerate() {
            let contribution = weight / (RRF_K + rank as f32 + 1.0);
            match fused.entry(result.document.id.clone()) {
                Entry::Occupied(mut entry) => entry.get_mut().score += contribution,
                Entry::Vacant(entry) => {
                    entry.insert(SearchResult {
                        score: contribution,
                        ..result
                    });
                }
            }
        }
    }

    let mut results: Vec<SearchResult> = fused.into_values().collect();
    sort_by_score_desc(&mut results);

    debug!("RRF produced {} results", results.len());
    results
}
