//! The byte-pair-merge inner loop: turns one piece of bytes into token ids.
//!
//! Two implementations, same semantics (see module tests): a naive O(n^2)
//! scan for short pieces, and a tombstoned min-heap variant for long ones.
//! The threshold is a performance knob, not a semantic one.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Range;

use crate::error::{Result, TokenizerError};
use crate::rank::RankMap;

/// Pieces at or under this length use the naive scan; longer ones use the heap.
pub(crate) const HEAP_THRESHOLD_BYTES: usize = 128;

fn missing_rank(bytes: &[u8]) -> TokenizerError {
    TokenizerError::MissingRank(bytes.to_vec())
}

fn rank_of(piece: &[u8], ranks: &RankMap, range: &Range<usize>) -> Option<usize> {
    ranks.get(&piece[range.start..range.end]).copied()
}

/// Repeatedly merges the adjacent pair with the lowest rank, leftmost first.
fn merge_naive(piece: &[u8], ranks: &RankMap) -> Vec<Range<usize>> {
    let mut parts: Vec<Range<usize>> = (0..piece.len()).map(|i| i..i + 1).collect();

    loop {
        if parts.len() == 1 {
            break;
        }
        let mut min_rank: Option<(usize, usize)> = None;
        for i in 0..parts.len() - 1 {
            let span = parts[i].start..parts[i + 1].end;
            let rank = match rank_of(piece, ranks, &span) {
                Some(r) => r,
                None => continue,
            };
            if min_rank.map_or(true, |(best, _)| rank < best) {
                min_rank = Some((rank, i));
            }
        }
        match min_rank {
            Some((_, i)) => {
                parts[i] = parts[i].start..parts[i + 1].end;
                parts.remove(i + 1);
            }
            None => break,
        }
    }

    parts
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    rank: usize,
    seq: u64,
    left: usize,
    right: usize,
    left_version: u32,
    right_version: u32,
}

/// Slot-indexed linked-list-over-an-arena variant of [`merge_naive`], used
/// once pieces get long enough that the O(n^2) scan would dominate. Each
/// merge bumps the left slot's version and tombstones the right slot; stale
/// heap entries are detected and discarded on pop rather than removed from
/// the heap in place.
fn merge_heap(piece: &[u8], ranks: &RankMap) -> Vec<Range<usize>> {
    let n = piece.len();
    let mut token_range: Vec<Range<usize>> = (0..n).map(|i| i..i + 1).collect();
    let mut next: Vec<Option<usize>> = (0..n).map(|i| (i + 1 < n).then_some(i + 1)).collect();
    let mut prev: Vec<Option<usize>> = (0..n).map(|i| (i > 0).then_some(i - 1)).collect();
    let mut alive = vec![true; n];
    let mut version = vec![0u32; n];
    let mut seq: u64 = 0;

    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    let push_pair = |heap: &mut BinaryHeap<Reverse<HeapEntry>>,
                         seq: &mut u64,
                         token_range: &[Range<usize>],
                         version: &[u32],
                         left: usize,
                         right: usize| {
        if let Some(rank) = rank_of(piece, ranks, &(token_range[left].start..token_range[right].end)) {
            *seq += 1;
            heap.push(Reverse(HeapEntry {
                rank,
                seq: *seq,
                left,
                right,
                left_version: version[left],
                right_version: version[right],
            }));
        }
    };

    for i in 0..n.saturating_sub(1) {
        push_pair(&mut heap, &mut seq, &token_range, &version, i, i + 1);
    }

    while let Some(Reverse(entry)) = heap.pop() {
        if !alive[entry.left] || !alive[entry.right] {
            continue;
        }
        if next[entry.left] != Some(entry.right) {
            continue;
        }
        if version[entry.left] != entry.left_version || version[entry.right] != entry.right_version {
            continue;
        }

        token_range[entry.left] = token_range[entry.left].start..token_range[entry.right].end;
        version[entry.left] = version[entry.left].wrapping_add(1);
        alive[entry.right] = false;

        let right_next = next[entry.right];
        next[entry.left] = right_next;
        if let Some(rn) = right_next {
            prev[rn] = Some(entry.left);
        }

        if let Some(p) = prev[entry.left] {
            push_pair(&mut heap, &mut seq, &token_range, &version, p, entry.left);
        }
        if let Some(rn) = next[entry.left] {
            push_pair(&mut heap, &mut seq, &token_range, &version, entry.left, rn);
        }
    }

    let mut result = Vec::with_capacity(n);
    let mut cur = Some(0);
    while let Some(i) = cur {
        result.push(token_range[i].clone());
        cur = next[i];
    }
    result
}

pub(crate) fn byte_pair_merge(piece: &[u8], ranks: &RankMap) -> Vec<Range<usize>> {
    if piece.len() <= HEAP_THRESHOLD_BYTES {
        merge_naive(piece, ranks)
    } else {
        merge_heap(piece, ranks)
    }
}

/// Turns one non-empty piece into a sequence of token ids.
pub(crate) fn byte_pair_encode(piece: &[u8], ranks: &RankMap) -> Result<Vec<usize>> {
    if let Some(&token) = ranks.get(piece) {
        return Ok(vec![token]);
    }
    byte_pair_merge(piece, ranks)
        .into_iter()
        .map(|range| {
            ranks
                .get(&piece[range.clone()])
                .copied()
                .ok_or_else(|| missing_rank(&piece[range]))
        })
        .collect()
}
