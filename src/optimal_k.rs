//! Read-only probe for a workable k-mer size.
//!
//! Grounded verbatim on `original_source/optimal_k.py`'s `is_optimal`: a
//! k-length de Bruijn graph is a candidate for having a unique Eulerian
//! cycle when its k-mers' prefix set equals its suffix set. This never
//! builds or mutates the pipeline's graph; it's a standalone scan over a
//! `HashSet` of distinct k-mers.

use std::collections::HashSet;

/// True if the set of (k-1)-length prefixes of every distinct k-mer in
/// `reads` equals the set of (k-1)-length suffixes.
pub fn is_optimal(k: usize, reads: &[&[u8]]) -> bool {
    if k == 0 {
        return false;
    }
    let mut kmers: HashSet<&[u8]> = HashSet::new();
    for read in reads {
        if read.len() < k {
            continue;
        }
        for i in 0..=(read.len() - k) {
            kmers.insert(&read[i..i + k]);
        }
    }
    let mut prefixes: HashSet<&[u8]> = HashSet::new();
    let mut suffixes: HashSet<&[u8]> = HashSet::new();
    for kmer in &kmers {
        prefixes.insert(&kmer[..kmer.len() - 1]);
        suffixes.insert(&kmer[1..]);
    }
    prefixes == suffixes
}

/// Search descending from `max_k` for the largest k for which `is_optimal`
/// holds. `max_k` is typically the shortest read length in the input.
pub fn find_optimal_k(max_k: usize, reads: &[&[u8]]) -> Option<usize> {
    (2..=max_k).rev().find(|&k| is_optimal(k, reads))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_read_is_always_optimal_at_full_length() {
        let read: &[u8] = b"ACGTACGT";
        assert!(is_optimal(read.len(), &[read]));
    }

    #[test]
    fn disjoint_reads_with_mismatched_prefix_suffix_sets_are_not_optimal() {
        // "AAAA" and "TTTT" share no k-mers; at k=3 prefixes={AA,TT} and
        // suffixes={AA,TT} happen to match, but at k=2 with an odd insertion
        // the sets diverge. Use a read pair engineered to break the match.
        let reads: Vec<&[u8]> = vec![b"AACG", b"CGTT"];
        // k=4 whole-read kmers: "AACG", "CGTT" -> prefixes {AAC, CGT}
        // suffixes {ACG, GTT} -- disjoint, not optimal.
        assert!(!is_optimal(4, &reads));
    }

    #[test]
    fn find_optimal_k_returns_largest_admissible_value() {
        let read: &[u8] = b"ACGTACGTACGT";
        let k = find_optimal_k(read.len(), &[read]).unwrap();
        assert!(is_optimal(k, &[read]));
    }
}
