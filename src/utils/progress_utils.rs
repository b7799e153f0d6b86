use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar of `len` steps, or `None` when stderr is not a terminal.
pub fn progress_bar(len: u64, msg: String) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .ok()?
            .progress_chars("##-")
    );
    bar.set_message(msg);

    Some(bar)
}

/// A spinner counting steps of unknown total, or `None` when stderr is not a terminal.
pub fn progress_bar_spinner(msg: String) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner} {pos} evaluations {msg}")
            .ok()?
    );
    bar.set_message(msg);

    Some(bar)
}
