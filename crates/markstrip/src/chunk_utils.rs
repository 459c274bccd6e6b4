//! Helpers for feeding text to the streaming APIs in pieces.
//!
//! Used by tests, benchmarks and the fuzz target to check that output does
//! not depend on where the input was split.

use alloc::vec::Vec;

/// Splits `payload` into `parts` pieces of roughly equal character count.
///
/// Pieces never split a character. Fewer pieces are returned when `payload`
/// has fewer than `parts` characters.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let total = payload.chars().count();
    let per_chunk = total.div_ceil(parts).max(1);
    let mut chunks = Vec::with_capacity(parts.min(total));
    let mut rest = payload;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(per_chunk)
            .map_or(rest.len(), |(idx, _)| idx);
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk);
        rest = tail;
    }
    chunks
}

/// Splits `payload` at positions derived from `seed`.
///
/// Every piece is non-empty and ends on a character boundary. The same seed
/// always yields the same split.
#[must_use]
pub fn split_seeded(payload: &str, seed: u64) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut state = seed | 1;
    let mut start = 0;
    while start < payload.len() {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let remaining = payload.len() - start;
        #[allow(clippy::cast_possible_truncation)]
        let mut end = start + 1 + (state % remaining as u64) as usize;
        while !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use quickcheck_macros::quickcheck;

    use super::*;

    #[quickcheck]
    fn seeded_split_partitions_any_text(payload: String, seed: u64) -> bool {
        let chunks = split_seeded(&payload, seed);
        chunks.concat() == payload && chunks.iter().all(|c| !c.is_empty())
    }

    #[test]
    fn chunks_cover_payload() {
        let payload = "<p>fi🐟sh &amp; chips</p>";
        for parts in 1..=payload.len() + 2 {
            let chunks = produce_chunks(payload, parts);
            assert_eq!(chunks.concat(), payload);
            assert!(chunks.len() <= parts);
            assert!(chunks.iter().all(|c| !c.is_empty()));
        }
        assert_eq!(produce_chunks("abcdef", 3), ["ab", "cd", "ef"]);
    }

    #[test]
    fn seeded_split_is_deterministic() {
        let payload = "åβΩ<b>x</b>&lt;";
        for seed in [0, 1, 7, u64::MAX] {
            let chunks = split_seeded(payload, seed);
            assert_eq!(chunks, split_seeded(payload, seed));
            assert_eq!(chunks.concat(), payload);
            assert!(chunks.iter().all(|c| !c.is_empty()));
        }
        assert!(split_seeded("", 3).is_empty());
    }
}
