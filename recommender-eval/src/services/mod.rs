pub mod experiment;
pub mod ingest;
pub mod metrics;
pub mod recommend;
pub mod similarity;
pub mod split;

pub use experiment::{ExperimentRunner, Phase};
pub use ingest::InteractionStore;
pub use recommend::{
    FrequencyProxyRecommender, NeighborhoodRecommender, PopularityRecommender, Recommender,
};
pub use similarity::cosine_similarity;
pub use split::Splitter;
