//! Invariants of segmentation, search, ordering and composition, checked
//! over generated inputs.

mod common;

use common::{DIMENSION, HashingEmbedder};
use docqa::answer::{compose, restore_order};
use docqa::documents::{SegmentProfile, Segmenter, WindowSegmenter, segment};
use docqa::vector::{EmbeddingGenerator, FlatL2Index};
use docqa::{Chunk, ChunkSequence};
use rand::prelude::*;
use rand::rngs::StdRng;

const ALPHABET: &[char] = &[
    'a', 'b', 'c', ' ', ' ', '\n', '1', '2', '.', 'é', 'x', 'y', '\t',
];

/// Seeded so a failing case can be replayed.
fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn random_text(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

#[test]
fn text_below_threshold_never_yields_chunks() {
    let mut rng = seeded(7);
    for _ in 0..200 {
        let len = rng.random_range(0..40);
        let text = random_text(&mut rng, len);
        assert!(segment(&text, 350).is_empty());
        assert!(segment(&text, 10).is_empty());
    }
}

#[test]
fn chunk_indices_are_dense() {
    let mut rng = seeded(11);
    for _ in 0..100 {
        let len = rng.random_range(0..3000);
        let text = random_text(&mut rng, len);
        let profile = SegmentProfile {
            window_chars: 1 + rng.random_range(0..400),
            min_chars: rng.random_range(0..5),
        };
        let chunks = WindowSegmenter.segment(&text, &profile);
        for (expected, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, expected);
            assert!(chunk.char_count() > profile.min_chars);
            assert!(chunk.char_count() <= profile.window_chars);
        }
    }
}

#[test]
fn restore_order_is_sorted_and_idempotent() {
    let mut rng = seeded(23);
    let full = ChunkSequence::from_texts((0..30).map(|i| format!("chunk number {i}")));

    for _ in 0..100 {
        let picks = 1 + rng.random_range(0..10);
        let retrieved: Vec<Chunk> = (0..picks)
            .map(|_| full[rng.random_range(0..full.len())].clone())
            .collect();

        let once = restore_order(retrieved.clone(), &full);
        assert!(once.windows(2).all(|w| w[0].index <= w[1].index));
        assert_eq!(restore_order(once.clone(), &full), once);

        let mut reversed = retrieved;
        reversed.reverse();
        let from_reversed: Vec<usize> = restore_order(reversed, &full)
            .iter()
            .map(|c| c.index)
            .collect();
        let expected: Vec<usize> = once.iter().map(|c| c.index).collect();
        assert_eq!(from_reversed, expected);
    }
}

#[test]
fn compose_output_has_no_short_or_repeated_lines() {
    let mut rng = seeded(31);
    for _ in 0..100 {
        let chunks: Vec<Chunk> = (0..1 + rng.random_range(0..6))
            .map(|i| {
                let len = rng.random_range(0..200);
                Chunk::new(i, random_text(&mut rng, len))
            })
            .collect();

        let answer = compose(&chunks);
        assert_eq!(answer, answer.trim());

        let mut seen = std::collections::HashSet::new();
        for line in answer.split('\n').filter(|l| !l.is_empty()) {
            assert!(line.chars().count() >= 4, "short line {line:?}");
            assert!(seen.insert(line.to_string()), "repeated line {line:?}");
        }
    }
}

#[test]
fn query_results_bounded_and_sorted() {
    let mut rng = seeded(43);
    for n in [1usize, 2, 5, 17, 64] {
        let texts: Vec<String> = (0..n).map(|_| random_text(&mut rng, 80)).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = HashingEmbedder.embed_batch(&refs).unwrap();
        let index = FlatL2Index::build(HashingEmbedder.dimension(), vectors).unwrap();
        assert_eq!(index.dimension().get(), DIMENSION);

        let query = HashingEmbedder.embed_one(&random_text(&mut rng, 40)).unwrap();
        for k in [1usize, 3, 8, 100] {
            let hits = index.query(&query, k).unwrap();
            assert_eq!(hits.len(), k.min(n));
            assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));

            let mut positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
            positions.sort();
            positions.dedup();
            assert_eq!(positions.len(), hits.len());
        }
    }
}
