//! Rank-quality metric for graded relevance lists.

/// Computes the average nDCG of a graded relevance list.
///
/// Cumulative DCG at each 1-indexed prefix length `i` is
/// `DCG[i] = DCG[i-1] + g[i] / log2(i+1)`; the ideal DCG is the same sum
/// over the grades sorted descending. The result is the arithmetic mean of
/// `DCG[i] / IDCG[i]` over every prefix, which makes the score sensitive to
/// the whole ranking rather than a single cutoff.
///
/// A prefix whose ideal DCG is zero (all grades zero so far) contributes 0,
/// so an all-zero list scores 0 rather than NaN. A descending-sorted list
/// scores exactly 1.
pub fn average_ndcg(grades: &[u32]) -> f64 {
    if grades.is_empty() {
        return 0.0;
    }

    let mut ideal = grades.to_vec();
    ideal.sort_unstable_by(|a, b| b.cmp(a));

    let mut dcg = 0.0;
    let mut idcg = 0.0;
    let mut accumulated = 0.0;
    for (i, (&grade, &ideal_grade)) in grades.iter().zip(&ideal).enumerate() {
        let discount = ((i + 2) as f64).log2();
        dcg += f64::from(grade) / discount;
        idcg += f64::from(ideal_grade) / discount;
        accumulated += if idcg == 0.0 { 0.0 } else { dcg / idcg };
    }

    accumulated / grades.len() as f64
}
