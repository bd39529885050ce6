//! Bounded capture of a script's textual output.

/// Collects `print` output up to a configured cap.
///
/// Once the cap is reached further lines are silently dropped and the
/// truncation flag is set. This is the one piece of machinery a failing
/// script must not be able to crash: `capture` accepts any input and
/// never errors. One collector per execution.
#[derive(Debug)]
pub struct OutputCollector {
    lines: Vec<String>,
    max_lines: usize,
    truncated: bool,
}

impl OutputCollector {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Vec::new(),
            max_lines,
            truncated: false,
        }
    }

    /// Append one line, dropping it if the buffer is full.
    pub fn capture(&mut self, line: String) {
        if self.lines.len() >= self.max_lines {
            if !self.truncated {
                self.truncated = true;
                tracing::debug!(max_lines = self.max_lines, "script output truncated");
            }
            return;
        }
        self.lines.push(line);
    }

    /// Snapshot the captured lines and the truncation flag. Does not
    /// reset state.
    pub fn drain(&self) -> (Vec<String>, bool) {
        (self.lines.clone(), self.truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_in_order() {
        let mut collector = OutputCollector::new(10);
        collector.capture("one".into());
        collector.capture("two".into());
        let (lines, truncated) = collector.drain();
        assert_eq!(lines, vec!["one", "two"]);
        assert!(!truncated);
    }

    #[test]
    fn boundary_cap_plus_one() {
        let mut collector = OutputCollector::new(3);
        for i in 0..4 {
            collector.capture(format!("line {i}"));
        }
        let (lines, truncated) = collector.drain();
        assert_eq!(lines.len(), 3);
        assert!(truncated);
        assert_eq!(lines[2], "line 2");
    }

    #[test]
    fn exactly_at_cap_is_not_truncated() {
        let mut collector = OutputCollector::new(2);
        collector.capture("a".into());
        collector.capture("b".into());
        let (lines, truncated) = collector.drain();
        assert_eq!(lines.len(), 2);
        assert!(!truncated);
    }

    #[test]
    fn drain_does_not_reset() {
        let mut collector = OutputCollector::new(10);
        collector.capture("kept".into());
        let _ = collector.drain();
        let (lines, _) = collector.drain();
        assert_eq!(lines, vec!["kept"]);
    }

    #[test]
    fn zero_cap_truncates_immediately() {
        let mut collector = OutputCollector::new(0);
        collector.capture("dropped".into());
        let (lines, truncated) = collector.drain();
        assert!(lines.is_empty());
        assert!(truncated);
    }
}
