//! Console output for the non-TUI commands (`mypctools update`).

use cliclack::{intro, log, outro, spinner};
use colored::*;
use std::future::Future;

pub fn print_banner(version: &str) {
    intro(format!(" mypctools v{} ", version)).ok();
}

pub fn print_success(message: &str) {
    log::success(message).ok();
}

pub fn print_error(message: &str) {
    log::error(message).ok();
}

pub fn print_info(message: &str) {
    log::info(message).ok();
}

pub fn print_warn(message: &str) {
    log::warning(message).ok();
}

/// `label: value` with the value highlighted.
pub fn print_detail(label: &str, value: &str) {
    log::remark(format!("{} {}", format!("{}:", label).dimmed(), value.cyan())).ok();
}

pub fn print_outro(msg: &str) {
    outro(msg).ok();
}

pub async fn with_spinner<F, Fut, T, E>(start_msg: &str, success_msg: &str, f: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let s = spinner();
    s.start(start_msg);
    let result = f().await;
    match &result {
        Ok(_) => s.stop(success_msg),
        Err(_) => s.stop("Failed"),
    }
    result
}
