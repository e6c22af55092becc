//! Progress presentation for pipeline stages
//!
//! Two reporters exist:
//! - [`SpinnerReporter`] shows an `indicatif` spinner while a stage runs
//! - [`PlainReporter`] prints one line per stage, used with `--verbose`
//!   where the build tool's own output is streamed and a spinner would
//!   garble it

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Reports the start and end of each pipeline stage
pub trait StageReporter {
    fn start(&mut self, stage: &str);

    fn finish(&mut self, message: &str);

    /// Stop the current stage without a success mark
    fn abandon(&mut self);
}

/// Pick the reporter matching the verbosity.
pub fn reporter(verbose: bool) -> Box<dyn StageReporter> {
    if verbose {
        Box::new(PlainReporter)
    } else {
        Box::new(SpinnerReporter::default())
    }
}

/// Spinner shown on stderr while a stage runs
#[derive(Default)]
pub struct SpinnerReporter {
    current: Option<ProgressBar>,
}

impl StageReporter for SpinnerReporter {
    fn start(&mut self, stage: &str) {
        self.abandon();
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) =
            ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            spinner.set_style(template);
        }
        spinner.set_message(stage.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.current = Some(spinner);
    }

    fn finish(&mut self, message: &str) {
        if let Some(spinner) = self.current.take() {
            spinner.finish_and_clear();
        }
        eprintln!("{} {}", style("✔").green(), message);
    }

    fn abandon(&mut self) {
        if let Some(spinner) = self.current.take() {
            spinner.abandon();
        }
    }
}

impl Drop for SpinnerReporter {
    fn drop(&mut self) {
        self.abandon();
    }
}

/// One styled line per stage
pub struct PlainReporter;

impl StageReporter for PlainReporter {
    fn start(&mut self, stage: &str) {
        eprintln!("{} {}", style("==>").cyan().bold(), style(stage).bold());
    }

    fn finish(&mut self, message: &str) {
        eprintln!("{} {}", style("✔").green(), message);
    }

    fn abandon(&mut self) {}
}

/// Records stage events; lets pipeline tests assert on the sequence
#[cfg(test)]
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Vec<String>,
}

#[cfg(test)]
impl StageReporter for RecordingReporter {
    fn start(&mut self, stage: &str) {
        self.events.push(format!("start: {stage}"));
    }

    fn finish(&mut self, message: &str) {
        self.events.push(format!("finish: {message}"));
    }

    fn abandon(&mut self) {
        self.events.push("abandon".to_string());
    }
}
