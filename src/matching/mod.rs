pub mod rank;
pub mod score;
