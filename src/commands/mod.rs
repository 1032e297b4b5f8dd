pub mod monthly;
pub mod prepost;
pub mod process;

/// Progress lines from one successful subcommand; every anomaly in this
/// pipeline is fatal and surfaces as an `Err` instead.
#[derive(Debug, Clone, Default)]
pub struct CommandReport {
    pub details: Vec<String>,
}

impl CommandReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }
}
