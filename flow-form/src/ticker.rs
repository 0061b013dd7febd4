use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::Form;

/// One-second cadence for the form timer.
///
/// The engine is synchronous; the owner drives it:
///
/// ```no_run
/// # async fn drive(mut form: flow_form::Form) {
/// use flow_form::Ticker;
///
/// let mut ticker = Ticker::new();
/// loop {
///     ticker.follow(&form);
///     ticker.tick().await;
///     form.tick();
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ticker {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Start ticking; the first tick is one period from now. No-op while
    /// running.
    pub fn start(&mut self) {
        if self.interval.is_none() {
            let mut interval = interval_at(Instant::now() + self.period, self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.interval = Some(interval);
        }
    }

    /// Stop ticking. Pending ticks are discarded.
    pub fn stop(&mut self) {
        self.interval = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Start or stop to mirror the form's timer.
    pub fn follow(&mut self, form: &Form) {
        if form.is_timer_running() {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Resolves once per period while running, never while stopped.
    pub async fn tick(&mut self) {
        match &mut self.interval {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use flow_form_types::{FormConfig, FormDefinition, Question, QuestionType};
    use tokio::time::timeout;

    use super::*;

    fn timed_form() -> Form {
        let definition = FormDefinition::new(vec![
            Question::new(QuestionType::Text, "Name?").required(),
        ])
        .with_config(FormConfig::default().with_timer());
        Form::new(definition).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let mut ticker = Ticker::new();
        ticker.start();

        let started = Instant::now();
        ticker.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(1));
        ticker.tick().await;
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_ticker_never_fires() {
        let mut ticker = Ticker::new();
        assert!(timeout(Duration::from_secs(10), ticker.tick()).await.is_err());

        ticker.start();
        ticker.stop();
        assert!(timeout(Duration::from_secs(10), ticker.tick()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn drives_the_form_timer() {
        let mut form = timed_form();
        let mut ticker = Ticker::new();

        for _ in 0..3 {
            ticker.follow(&form);
            ticker.tick().await;
            form.tick();
        }

        assert_eq!(form.elapsed(), 3);
        assert_eq!(form.formatted_time(), "00:03");
    }

    #[test]
    fn follows_form_state() {
        let mut ticker = Ticker::new();
        let form = Form::new(FormDefinition::default()).unwrap();
        ticker.follow(&form);
        assert!(!ticker.is_running());
    }
}
