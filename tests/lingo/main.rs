mod control_flow;
mod errors;
mod expressions;
mod scripts;
