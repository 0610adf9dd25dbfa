//! Derivation loops: supervised training and greedy decoding

pub mod decoder;
pub mod trainer;

pub use decoder::SyntaxDecoder;
pub use trainer::{ActionsScorerTrainer, TrainerStats};
