pub mod assemble;
pub mod collect;
pub mod completion;
pub mod config;
pub mod preview;
pub mod serve;
