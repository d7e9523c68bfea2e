use log::{debug, info, warn};

/// Routes pipeline messages through the `log` facade, tagged with the section.
#[derive(Debug, Clone, Default)]
pub struct LogManager {
    section: Option<String>,
}

impl LogManager {
    pub fn new() -> Self {
        Self { section: None }
    }

    pub fn for_section(section: &str) -> Self {
        Self {
            section: Some(section.to_string()),
        }
    }

    pub fn set_section(&mut self, section: &str) {
        self.section = Some(section.to_string());
    }

    pub fn record(&self, message: &str) {
        info!("{}{}", self.prefix(), message);
    }

    pub fn detail(&self, message: &str) {
        debug!("{}{}", self.prefix(), message);
    }

    pub fn warn(&self, message: &str) {
        warn!("{}{}", self.prefix(), message);
    }

    fn prefix(&self) -> String {
        match &self.section {
            Some(section) => format!("[{}] ", section),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_names_the_section() {
        assert_eq!(LogManager::new().prefix(), "");
        assert_eq!(LogManager::for_section("S-04").prefix(), "[S-04] ");
    }
}
