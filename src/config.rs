use std::time::Duration;

/// Which pipeline a run executes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Workflow {
    /// Submit new concept names through the creation form.
    Create,
    /// Search existing concept names and read back their identifiers.
    Lookup,
}

impl Workflow {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Some(Workflow::Create),
            "lookup" => Some(Workflow::Lookup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::Create => "create",
            Workflow::Lookup => "lookup",
        }
    }
}

/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub workflow: Workflow,
    /// Login page URL
    pub login_url: String,
    /// URL fragment that confirms the landing page after login
    pub home_fragment: String,
    /// Concept creation form URL
    pub form_url: String,
    /// Concept dictionary search page URL
    pub index_url: String,
    /// Credentials for this workflow variant
    pub username: String,
    pub password: String,
    /// Input spreadsheet (CSV with a concept_name column)
    pub input_path: String,
    /// Output spreadsheet, overwritten at end of run
    pub output_path: String,
    /// Append-only error log
    pub error_log_path: String,
    /// Fixed classification selections for the creation form
    pub concept_class: String,
    pub datatype: String,
    /// Short wait: the deliberately brief duplicate-notice probe
    pub probe_wait_secs: u64,
    /// Medium wait: field readiness
    pub field_wait_secs: u64,
    /// Long wait: login round-trips
    pub login_wait_secs: u64,
    /// Long wait: result identifier extraction
    pub extract_wait_secs: u64,
    /// Post-submit settle delay (the form transition has no ready-signal)
    pub settle_millis: u64,
    pub headless: bool,
    /// Block for operator acknowledgment before exiting
    pub wait_on_exit: bool,
}

impl Config {
    /// Built-in defaults for one workflow variant. Each variant carries its
    /// own credential pair and input file, matching how the two pipelines
    /// are operated.
    pub fn defaults_for(workflow: Workflow) -> Self {
        let base = "https://ba.kenyahmis.org";
        let (username, password, input_path) = match workflow {
            Workflow::Create => ("Quality", "Quality123", "icd11_concepts.csv"),
            Workflow::Lookup => ("Admin", "Admin123", "read_concepts.csv"),
        };
        Self {
            workflow,
            login_url: format!("{}/openmrs/spa/login", base),
            home_fragment: "/openmrs/spa/home".to_string(),
            form_url: format!("{}/openmrs/dictionary/concept.form", base),
            index_url: format!("{}/openmrs/dictionary/index.htm", base),
            username: username.to_string(),
            password: password.to_string(),
            input_path: input_path.to_string(),
            output_path: "updated_icd11_concepts.csv".to_string(),
            error_log_path: "error_log.txt".to_string(),
            concept_class: "Anatomy".to_string(),
            datatype: "N/A".to_string(),
            probe_wait_secs: 2,
            field_wait_secs: 10,
            login_wait_secs: 30,
            extract_wait_secs: 20,
            settle_millis: 2000,
            headless: true,
            wait_on_exit: true,
        }
    }

    pub fn from_env(workflow: Workflow) -> Self {
        let default = Self::defaults_for(workflow);
        Self {
            workflow,
            login_url: std::env::var("LOGIN_URL").unwrap_or(default.login_url),
            home_fragment: std::env::var("HOME_FRAGMENT").unwrap_or(default.home_fragment),
            form_url: std::env::var("CONCEPT_FORM_URL").unwrap_or(default.form_url),
            index_url: std::env::var("DICTIONARY_URL").unwrap_or(default.index_url),
            username: std::env::var("OPENMRS_USERNAME").unwrap_or(default.username),
            password: std::env::var("OPENMRS_PASSWORD").unwrap_or(default.password),
            input_path: std::env::var("INPUT_FILE").unwrap_or(default.input_path),
            output_path: std::env::var("OUTPUT_FILE").unwrap_or(default.output_path),
            error_log_path: std::env::var("ERROR_LOG_FILE").unwrap_or(default.error_log_path),
            concept_class: std::env::var("CONCEPT_CLASS").unwrap_or(default.concept_class),
            datatype: std::env::var("CONCEPT_DATATYPE").unwrap_or(default.datatype),
            probe_wait_secs: std::env::var("PROBE_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.probe_wait_secs),
            field_wait_secs: std::env::var("FIELD_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.field_wait_secs),
            login_wait_secs: std::env::var("LOGIN_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.login_wait_secs),
            extract_wait_secs: std::env::var("EXTRACT_WAIT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.extract_wait_secs),
            settle_millis: std::env::var("SETTLE_MILLIS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.settle_millis),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            wait_on_exit: std::env::var("WAIT_ON_EXIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.wait_on_exit),
        }
    }

    // ========== Duration accessors ==========

    pub fn probe_wait(&self) -> Duration {
        Duration::from_secs(self.probe_wait_secs)
    }

    pub fn field_wait(&self) -> Duration {
        Duration::from_secs(self.field_wait_secs)
    }

    pub fn login_wait(&self) -> Duration {
        Duration::from_secs(self.login_wait_secs)
    }

    pub fn extract_wait(&self) -> Duration {
        Duration::from_secs(self.extract_wait_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_parse_accepts_both_variants() {
        assert_eq!(Workflow::parse("create"), Some(Workflow::Create));
        assert_eq!(Workflow::parse("Lookup"), Some(Workflow::Lookup));
        assert_eq!(Workflow::parse(" CREATE "), Some(Workflow::Create));
        assert_eq!(Workflow::parse("delete"), None);
    }

    #[test]
    fn variants_carry_their_own_credentials() {
        let create = Config::defaults_for(Workflow::Create);
        let lookup = Config::defaults_for(Workflow::Lookup);

        assert_eq!(create.username, "Quality");
        assert_eq!(lookup.username, "Admin");
        assert_ne!(create.input_path, lookup.input_path);
        // Both variants write to the same output path.
        assert_eq!(create.output_path, lookup.output_path);
    }

    #[test]
    fn probe_wait_is_shorter_than_field_and_login_waits() {
        let config = Config::defaults_for(Workflow::Create);
        assert!(config.probe_wait() < config.field_wait());
        assert!(config.field_wait() < config.login_wait());
    }
}
