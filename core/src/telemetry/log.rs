use log::{error, info, warn};

use crate::prelude::{Diagnostic, Severity};

/// Forwards diagnostics to the `log` facade at the matching level.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity {
            Severity::Error => error!("{}", diagnostic.message),
            Severity::Warning => warn!("{}", diagnostic.message),
            Severity::Info => info!("{}", diagnostic.message),
        }
    }

    pub fn record_all(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.record(diagnostic);
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
