//! Bounded character-sequence similarity between normalized strings.
//!
//! The ratio is `2 * M / T`, where `T` is the combined length of both strings
//! and `M` is the number of characters covered by matching blocks found by
//! repeatedly taking the longest common substring and recursing on the text
//! to its left and right (Ratcliff/Obershelp).

use std::collections::HashMap;

/// Minimum similarity for a fuzzy pairing to be accepted. Applied by callers.
pub const MIN_SCORE: f64 = 0.80;

/// Similarity ratio in `[0, 1]`.
///
/// Symmetric: the pair is put into a canonical order before scoring, so
/// `similarity(a, b) == similarity(b, a)` bit for bit. Two empty strings are
/// identical and score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();

    let total = first.len() + second.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_characters(&first, &second);
    (2 * matched) as f64 / total as f64
}

/// Linear scan for the highest-scoring candidate.
///
/// Comparison is strict `>`, starting from 0.0, so the first-seen candidate
/// wins ties and a candidate scoring 0.0 is never returned.
pub fn best_match<'c, I>(target: &str, candidates: I) -> (Option<&'c str>, f64)
where
    I: IntoIterator<Item = &'c str>,
{
    let mut best = None;
    let mut best_score = 0.0;
    for candidate in candidates {
        let score = similarity(target, candidate);
        if score > best_score {
            best = Some(candidate);
            best_score = score;
        }
    }
    (best, best_score)
}

/// Inclusive threshold check: a score exactly at `min_score` is accepted.
pub fn meets_threshold(score: f64, min_score: f64) -> bool {
    score >= min_score
}

/// Score as a whole percentage, halves rounded to even.
pub fn percent(score: f64) -> u8 {
    (score * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

/// Total size of all matching blocks between `a` and `b`.
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Among equally long blocks the one starting earliest in `a` wins, then
/// earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // j2len[j] = length of the match ending at a[i - 1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let len = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                next.insert(j, len);
                if len > best_len {
                    best_i = i + 1 - len;
                    best_j = j + 1 - len;
                    best_len = len;
                }
            }
        }
        j2len = next;
    }
    (best_i, best_j, best_len)
}
