// Model-backed writing steps: draft, score, revise
pub mod response_parsing;
pub mod draft_generator;
pub mod quality_scorer;
pub mod reviser;

pub use draft_generator::DraftGenerator;
pub use quality_scorer::{QualityScorer, Verdict};
pub use response_parsing::DraftText;
pub use reviser::Reviser;
