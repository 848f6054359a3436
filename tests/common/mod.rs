//! Shared fixtures for integration tests.
//!
//! `HashingEmbedder` stands in for the real model: bag-of-words counts hashed
//! into a small vector, then normalized. Texts sharing words end up close.

#![allow(dead_code)]

use docqa::extract::PlainTextExtractor;
use docqa::vector::{EmbeddingGenerator, VectorDimension, VectorResult};
use docqa::{Assistant, Settings};

pub const DIMENSION: usize = 64;

pub struct HashingEmbedder;

impl HashingEmbedder {
    fn embed(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; DIMENSION];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let slot = fnv1a(&word.to_lowercase()) as usize % DIMENSION;
            vector[slot] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl EmbeddingGenerator for HashingEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> VectorResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::embed(t)).collect())
    }

    fn dimension(&self) -> VectorDimension {
        VectorDimension::new(DIMENSION).unwrap()
    }
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf29ce484222325, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x100000001b3)
    })
}

/// Assistant over plain text with the hashing embedder and default settings.
pub fn assistant() -> Assistant {
    Assistant::from_settings(
        &Settings::default(),
        Box::new(PlainTextExtractor),
        Box::new(HashingEmbedder),
    )
    .unwrap()
}

/// Pad `text` with spaces to exactly one interactive window (350 chars).
pub fn window(text: &str) -> String {
    let window_chars = Settings::default().segmentation.interactive.window_chars;
    assert!(text.chars().count() <= window_chars, "fixture text too long");
    format!("{text:<window_chars$}")
}

/// A document made of one window per section.
pub fn document(sections: &[&str]) -> String {
    sections.iter().map(|s| window(s)).collect()
}
