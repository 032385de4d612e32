pub mod clustering;
pub mod dataset;
pub mod links;
pub mod providers;
pub mod ranker;
pub mod recommendations;
pub mod recommender;
pub mod similarity;
pub mod text;
pub mod vectorizer;

pub use recommendations::{RecommendationService, ReferenceCorpora};
pub use recommender::{Recommender, RecommenderSettings};
