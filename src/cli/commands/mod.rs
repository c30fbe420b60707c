mod eval;
mod export;
mod run;

pub use eval::{cmd_eval, cmd_eval_tags};
pub use export::cmd_export_trees;
pub use run::cmd_run;
