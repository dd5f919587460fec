use spinners_rs::{Spinner, Spinners};

// ESEQ is for "escape sequence"
pub const ESEQ_DELETE_LINE: &str = "\x1b[0J";
pub const ESEQ_RED: &str = "\x1b[38;5;1m";
pub const ESEQ_GREEN: &str = "\x1b[38;5;2m";
pub const ESEQ_WEAK: &str = "\x1b[38;5;240m";
pub const ESEQ_RESET: &str = "\x1b[m";

pub const SPINNER_MS: u64 = 50;

/// Spinner shown by the CLI while a quiet operation runs.
pub struct ProgressView {
    task: String,
    spinner: Spinner,
}

impl ProgressView {
    pub fn new(task: impl ToString) -> Self {
        let mut spinner = Spinner::new(Spinners::BouncingBar, task.to_string());
        spinner.set_interval(SPINNER_MS);

        Self {
            task: task.to_string(),
            spinner,
        }
    }

    pub fn start(&mut self) {
        self.spinner.start();
    }

    pub fn success(&mut self, message: Option<&str>) {
        self.spinner.stop_with_message(format!(
            "{ESEQ_DELETE_LINE}{ESEQ_GREEN}✓ {}{}{ESEQ_RESET}",
            self.task,
            message
                .map(|message| format!(" - {}", message))
                .unwrap_or("".to_owned())
        ));
        println!();
    }

    pub fn failure(&mut self, message: Option<&str>) {
        self.spinner.stop_with_message(format!(
            "{ESEQ_DELETE_LINE}{ESEQ_RED}! {}{}{ESEQ_RESET}",
            self.task,
            message
                .map(|message| format!(" - {}", message))
                .unwrap_or("".to_owned())
        ));
        println!();
    }
}

/// One human readable line per completed step, printed only when verbose.
///
/// Every step is also emitted as a `tracing` event regardless of the flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepLog {
    verbose: bool,
}

impl StepLog {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn step(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::debug!("{message}");

        if self.verbose {
            println!("{message}");
        }
    }

    /// Same as [`step`](Self::step), with a dimmed detail after the message.
    pub fn step_with(&self, message: impl AsRef<str>, detail: impl AsRef<str>) {
        let (message, detail) = (message.as_ref(), detail.as_ref());
        tracing::debug!(detail, "{message}");

        if self.verbose {
            println!("{message}{ESEQ_WEAK} - {detail}{ESEQ_RESET}");
        }
    }
}
