pub mod evaluator;
pub mod flow;
pub mod question;
pub mod results;
pub mod sentence;
pub mod timer;
