use num_traits::Float;
use std::cmp::Ordering;

/// Assign mid-ranks to `values` (ties share their average rank).
///
/// Returns the rank of each input value in its original position together
/// with the tie term `Σ (t³ − t)` over all tie groups, which the rank tests
/// need for their variance corrections.
pub fn rank_with_ties<T>(values: &[T]) -> (Vec<T>, f64)
where
    T: Float,
{
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![T::zero(); n];
    let mut tie_term = 0.0;

    let mut i = 0;
    while i < n {
        let val = values[order[i]];
        let mut j = i + 1;

        // Find tied values
        while j < n && values[order[j]] == val {
            j += 1;
        }

        // Assign average rank to ties
        let rank = T::from(i + j - 1).unwrap() / T::from(2.0).unwrap() + T::one();
        for k in i..j {
            ranks[order[k]] = rank;
        }

        let t = (j - i) as f64;
        tie_term += t * t * t - t;

        i = j;
    }

    (ranks, tie_term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_without_ties() {
        let (ranks, tie_term) = rank_with_ties(&[3.0, 1.0, 2.0]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
        assert_eq!(tie_term, 0.0);
    }

    #[test]
    fn ranks_with_ties_are_averaged() {
        // 1.0 occupies ranks 1 and 2, 2.0 occupies ranks 3, 4 and 5
        let (ranks, tie_term) = rank_with_ties(&[2.0, 1.0, 2.0, 1.0, 2.0]);
        assert_eq!(ranks, vec![4.0, 1.5, 4.0, 1.5, 4.0]);
        // (2^3 - 2) + (3^3 - 3)
        assert_eq!(tie_term, 30.0);
    }

    #[test]
    fn empty_input() {
        let (ranks, tie_term) = rank_with_ties::<f64>(&[]);
        assert!(ranks.is_empty());
        assert_eq!(tie_term, 0.0);
    }
}
