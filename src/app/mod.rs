// Application layer: CLI commands wired on top of core.

pub mod commands;
