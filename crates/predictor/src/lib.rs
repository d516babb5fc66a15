pub mod model;
pub mod shared;
pub mod tokenizer;

pub use model::{NGramModel, Prediction, PredictorConfig, PredictorError};
pub use shared::SharedModel;
pub use tokenizer::tokenize;
