//! Shifter-target resolution and per-sentence polarity annotation.

pub mod annotator;
pub mod candidate;
pub mod hits;
pub mod orientation;
pub mod scope;
pub mod sentence;
pub mod shift;
pub mod strategy;

pub use annotator::SentenceAnnotator;
pub use candidate::{Candidate, ShifterHit};
pub use hits::RuleHits;
pub use orientation::orientation_check;
pub use sentence::ParsedSentence;
pub use shift::{shift, Shifted, SHIFT_AMOUNT};
pub use strategy::{
    ClauseBaseline, DependencyScope, Resolution, ShifterResolver, Strategy, WindowBaseline,
    WindowDirection,
};
