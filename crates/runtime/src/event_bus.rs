use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// Non-fatal, user-facing message raised by the viewer core.
///
/// Presentation is left to whoever drains the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub seq: u64,
    pub level: NoticeLevel,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct NoticeBus {
    next_seq: u64,
    notices: Vec<Notice>,
}

impl NoticeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, level: NoticeLevel, kind: &'static str, message: impl Into<String>) {
        self.notices.push(Notice {
            seq: self.next_seq,
            level,
            kind,
            message: message.into(),
        });
        self.next_seq += 1;
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeBus, NoticeLevel};

    #[test]
    fn records_notices_in_order() {
        let mut bus = NoticeBus::new();
        bus.emit(NoticeLevel::Error, "load_failed", "group 3 failed");
        bus.emit(NoticeLevel::Info, "test", "hello");
        assert_eq!(bus.notices().len(), 2);
        assert_eq!(bus.notices()[0].seq, 0);
        assert_eq!(bus.notices()[1].seq, 1);
        assert_eq!(bus.notices()[0].kind, "load_failed");
    }

    #[test]
    fn drain_clears_but_keeps_sequence() {
        let mut bus = NoticeBus::new();
        bus.emit(NoticeLevel::Warning, "k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.notices().is_empty());

        bus.emit(NoticeLevel::Warning, "k", "again");
        assert_eq!(bus.notices()[0].seq, 1);
    }
}
