use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pkg_pulse::fetch::Progress;
use std::time::Instant;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {pos}/{len} {msg}";

/// A progress bar that delays showing itself until a threshold is reached.
///
/// With `delay` of `None` the bar never becomes visible, which keeps log
/// output readable when logging is enabled.
#[derive(Debug)]
pub struct ProgressReporter {
    bar: ProgressBar,
    visible_after: Option<Instant>,
    visible: AtomicBool,
}

impl ProgressReporter {
    #[must_use]
    pub fn new(delay: Option<Duration>, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        let template = if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .expect("could not create progress bar style")
                .progress_chars("=> "),
        );

        Self {
            bar,
            visible_after: delay.and_then(|delay| Instant::now().checked_add(delay)),
            visible: AtomicBool::new(false),
        }
    }

    fn reveal_if_due(&self) {
        if self.visible.load(Ordering::Relaxed) {
            return;
        }
        if let Some(after) = self.visible_after
            && Instant::now() >= after
        {
            self.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
    }

    fn start_items(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn item_done(&self, name: &str) {
        self.reveal_if_due();
        self.bar.inc(1);
        self.bar.set_message(name.to_string());
    }

    fn done(&self) {
        if self.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}
