use super::signal::KillSignal;

/// Trait for systems that react to kill signals.
/// Implement this for the ledger bridge, loggers, UI refresh hooks, etc.
pub trait SignalHandler {
    /// Handle a single signal.
    fn handle_signal(&mut self, signal: &KillSignal);

    /// Handle multiple signals (default implementation calls handle_signal for each)
    fn handle_signals(&mut self, signals: &[KillSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}

/// Collects every signal; handy for replays and tests.
#[derive(Debug, Default)]
pub struct SignalLog {
    pub signals: Vec<KillSignal>,
}

impl SignalHandler for SignalLog {
    fn handle_signal(&mut self, signal: &KillSignal) {
        self.signals.push(signal.clone());
    }
}
