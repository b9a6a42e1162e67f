mod interrupted_runs;
mod log_structure;
mod tail_repair;
