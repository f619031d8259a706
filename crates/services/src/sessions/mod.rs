mod timed;

pub use timed::{SessionOptions, TimedQuizSession};
