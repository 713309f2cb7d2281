use crate::model::Parameters;

/// Receives one human-readable status line per reported epoch. The trainer
/// calls this synchronously; buffering, thread marshaling and rendering are
/// the caller's business.
pub trait ProgressSink {
    fn log(&mut self, line: &str);
}

impl<F: FnMut(&str)> ProgressSink for F {
    fn log(&mut self, line: &str) {
        self(line)
    }
}

/// Receives a parameter snapshot after every committed epoch, e.g. to feed a
/// live plot through a channel.
pub trait ModelSink {
    fn snapshot(&mut self, params: &Parameters);
}

impl<F: FnMut(&Parameters)> ModelSink for F {
    fn snapshot(&mut self, params: &Parameters) {
        self(params)
    }
}
