pub mod label_outcome;

pub use label_outcome::consume_label_outcomes;
