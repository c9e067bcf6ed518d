pub mod aligner;

pub use aligner::{align, encoding_for, EncodingMode, FeatureRow, ModelSchema};
