//! One run at a time per run kind

use crate::domain::{Result, ToolboxError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The two kinds of bulk run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    /// Zip archive on the local machine
    Local,
    /// Push to a Notion database
    Sync,
}

impl RunKind {
    /// Progress key shared by every event of a run of this kind
    pub fn progress_key(&self) -> &'static str {
        match self {
            RunKind::Local => "exportAllToLocal",
            RunKind::Sync => "exportAllToNotion",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            RunKind::Local => "local export",
            RunKind::Sync => "Notion sync",
        }
    }
}

/// Run-in-progress flags, cheap to clone and share between orchestrators
#[derive(Debug, Clone, Default)]
pub struct RunGuards {
    local: Arc<AtomicBool>,
    sync: Arc<AtomicBool>,
}

impl RunGuards {
    /// Creates a set of released guards
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, kind: RunKind) -> &Arc<AtomicBool> {
        match kind {
            RunKind::Local => &self.local,
            RunKind::Sync => &self.sync,
        }
    }

    /// Claims the guard for `kind`, or fails if a run of that kind is active
    pub fn try_acquire(&self, kind: RunKind) -> Result<RunPermit> {
        let flag = self.flag(kind);
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ToolboxError::RunInProgress(kind.label().to_string()))?;

        tracing::debug!(run = kind.label(), "Run guard acquired");
        Ok(RunPermit {
            flag: Arc::clone(flag),
            kind,
        })
    }

    /// Whether a run of `kind` currently holds the guard
    pub fn is_running(&self, kind: RunKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }
}

/// Held for the lifetime of a run; releases the guard on drop
#[derive(Debug)]
pub struct RunPermit {
    flag: Arc<AtomicBool>,
    kind: RunKind,
}

impl RunPermit {
    /// Kind of run this permit belongs to
    pub fn kind(&self) -> RunKind {
        self.kind
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        tracing::debug!(run = self.kind.label(), "Run guard released");
    }
}
