//! Sequence similarity for fuzzy keyword detection.
//!
//! Ratcliff/Obershelp: find the longest common block, recurse on the pieces
//! left and right of it, and score `2 * matched / (len_a + len_b)`. This
//! rewards long shared runs more than plain edit distance does, which suits
//! OCR output where words are mostly intact but split or merged.

use rust_decimal::Decimal;

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_a, start_b, len)`. Ties go to the block starting earliest in `a`,
/// then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // run[j - blo + 1] = length of the common run ending at a[i-1], b[j]
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut curr = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;
            if a[i] == b[j] {
                curr[k] = prev[k - 1] + 1;
                if curr[k] > best_len {
                    best_len = curr[k];
                    best_i = i + 1 - best_len;
                    best_j = j + 1 - best_len;
                }
            } else {
                curr[k] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_len)
}

/// Total characters covered by recursively found common blocks.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    total
}

/// Similarity ratio in `[0, 1]`. Two empty sequences are identical.
pub fn ratio(a: &[char], b: &[char]) -> Decimal {
    let total = a.len() + b.len();
    if total == 0 {
        return Decimal::ONE;
    }
    let matched = matched_chars(a, b);
    Decimal::from(2 * matched as u64) / Decimal::from(total as u64)
}

/// [`ratio`] over string slices.
pub fn ratio_str(a: &str, b: &str) -> Decimal {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio(&a, &b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_identical() {
        assert_eq!(
            ratio_str("analisis risiko", "analisis risiko"),
            Decimal::ONE
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(ratio_str("", ""), Decimal::ONE);
        assert_eq!(ratio_str("cdd", ""), Decimal::ZERO);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(ratio_str("abc", "xyz"), Decimal::ZERO);
    }

    #[test]
    fn test_known_ratio() {
        // "abcd" vs "bcde": block "bcd" -> 2*3/8
        assert_eq!(ratio_str("abcd", "bcde"), dec!(0.75));
    }

    #[test]
    fn test_recurses_both_sides() {
        // "xaby" vs "zabw": block "ab" only -> 4/8
        assert_eq!(ratio_str("xaby", "zabw"), dec!(0.5));
        // "abxcd" vs "abycd": "ab" then "cd" on the right -> 8/10
        assert_eq!(ratio_str("abxcd", "abycd"), dec!(0.8));
    }

    #[test]
    fn test_ocr_noise_still_close() {
        let r = ratio_str("analisis risiko", "ana1isis risik0 d");
        assert!(r > dec!(0.6), "ratio {r}");
    }

    #[test]
    fn test_symmetric_on_simple_inputs() {
        assert_eq!(ratio_str("edd", "ed d"), ratio_str("ed d", "edd"));
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        assert_eq!(longest_match(&a, &b, 0, 4, 0, 2), (0, 0, 2));
    }
}
