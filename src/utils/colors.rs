/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Green once the goal is reached, yellow while in progress, grey at zero.
pub fn color_for_progress(value: u64, goal: u64) -> &'static str {
    if value == 0 {
        GREY
    } else if value >= goal {
        GREEN
    } else {
        YELLOW
    }
}

/// Color used for a cache generation state label.
pub fn color_for_generation_state(state: &str) -> &'static str {
    match state {
        "active" => GREEN,
        "waiting" => YELLOW,
        "installing" => CYAN,
        "redundant" => GREY,
        _ => RESET,
    }
}

pub fn colorize(value: &str, color: &str) -> String {
    format!("{color}{value}{RESET}")
}
