//! Metric categories selected on the command line.

/// Which categories to sample and report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    pub cpu: bool,
    pub memory: bool,
    pub disk: bool,
    pub network: bool,
    pub thermal: bool,
    /// Interface to report; the busiest one is picked when `None`.
    pub interface: Option<String>,
}

impl Categories {
    /// Every category, network interface auto-selected.
    pub fn all() -> Self {
        Self {
            cpu: true,
            memory: true,
            disk: true,
            network: true,
            thermal: true,
            interface: None,
        }
    }

    /// Interprets positional words: `CPU`, `RAM`, `IO`, `NET`, `TEMP`.
    ///
    /// Any other word enables `NET` and names the interface to report;
    /// when several are given the last one wins.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
        let mut categories = Self::default();
        for word in words {
            match word.as_ref() {
                "CPU" => categories.cpu = true,
                "RAM" => categories.memory = true,
                "IO" => categories.disk = true,
                "NET" => categories.network = true,
                "TEMP" => categories.thermal = true,
                "" => {}
                name => {
                    categories.network = true;
                    categories.interface = Some(name.to_string());
                }
            }
        }
        categories
    }
}
