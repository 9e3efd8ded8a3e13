pub mod bj;
pub mod run;
