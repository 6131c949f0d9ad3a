//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Widest gazette search window accepted, in days.
const MAX_SEARCH_DAYS: i64 = 3650;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Candidate being tracked
    #[serde(default)]
    pub candidate: CandidateConfig,

    /// Notification delivery settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Official gazette search settings
    #[serde(default)]
    pub gazette: GazetteConfig,

    /// History persistence settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Listing pages to crawl, in order
    #[serde(default = "defaults::listings")]
    pub listings: Vec<ListingSource>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No configuration at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        log::debug!("Loading configuration from {}", path.display());
        Self::load(path)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides using an arbitrary variable lookup.
    ///
    /// Recognized variables: `MEU_NOME`, `CALLMEBOT_PHONE`, `CALLMEBOT_APIKEY`,
    /// `DOE_SEARCH_DAYS`, `DOE_PAGE_SIZE` and `HISTORY_FILE`. Empty values and
    /// unparsable numbers are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = var("MEU_NOME") {
            self.candidate.name = name.trim().to_string();
        }
        if let Some(phone) = var("CALLMEBOT_PHONE") {
            self.notifier.phone = phone;
        }
        if let Some(key) = var("CALLMEBOT_APIKEY") {
            self.notifier.api_key = key;
        }
        if let Some(days) = var("DOE_SEARCH_DAYS") {
            match days.trim().parse() {
                Ok(days) => self.gazette.search_days = days,
                Err(_) => log::warn!("Ignoring DOE_SEARCH_DAYS={days:?}: not a number"),
            }
        }
        if let Some(size) = var("DOE_PAGE_SIZE") {
            match size.trim().parse() {
                Ok(size) => self.gazette.page_size = size,
                Err(_) => log::warn!("Ignoring DOE_PAGE_SIZE={size:?}: not a number"),
            }
        }
        if let Some(path) = var("HISTORY_FILE") {
            self.storage.history_file = PathBuf::from(path);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.listings.is_empty() {
            return Err(AppError::config("No listing pages configured"));
        }
        if let Some(bad) = self
            .listings
            .iter()
            .find(|l| url::Url::parse(&l.url).is_err())
        {
            return Err(AppError::config(format!(
                "Listing '{}' has an invalid URL: {}",
                bad.label, bad.url
            )));
        }
        if self.candidate.name.trim().is_empty() {
            return Err(AppError::validation("candidate.name is empty"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.download_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.download_timeout_secs must be > 0",
            ));
        }
        if self.crawler.max_processes_per_page == 0 {
            return Err(AppError::validation(
                "crawler.max_processes_per_page must be > 0",
            ));
        }
        if self.crawler.detail_link_marker.is_empty() {
            return Err(AppError::validation("crawler.detail_link_marker is empty"));
        }
        if self.gazette.enabled {
            if self.gazette.page_size == 0 {
                return Err(AppError::validation("gazette.page_size must be > 0"));
            }
            if !(1..=MAX_SEARCH_DAYS).contains(&self.gazette.search_days) {
                return Err(AppError::validation(format!(
                    "gazette.search_days must be between 1 and {MAX_SEARCH_DAYS}"
                )));
            }
            if url::Url::parse(&self.gazette.api_base).is_err() {
                return Err(AppError::validation("gazette.api_base is not a valid URL"));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            candidate: CandidateConfig::default(),
            notifier: NotifierConfig::default(),
            crawler: CrawlerConfig::default(),
            gazette: GazetteConfig::default(),
            storage: StorageConfig::default(),
            listings: defaults::listings(),
        }
    }
}

/// The person whose name is searched for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Full name as it appears in published documents
    #[serde(default = "defaults::candidate_name")]
    pub name: String,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            name: defaults::candidate_name(),
        }
    }
}

/// CallMeBot WhatsApp settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Destination phone registered with CallMeBot
    #[serde(default)]
    pub phone: String,

    /// CallMeBot API key
    #[serde(default)]
    pub api_key: String,

    /// Messaging endpoint
    #[serde(default = "defaults::notifier_endpoint")]
    pub endpoint: String,

    /// Pause after every send, honoring the provider's rate limit
    #[serde(default = "defaults::notifier_delay")]
    pub delay_secs: u64,
}

impl NotifierConfig {
    /// Whether both credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.phone.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            phone: String::new(),
            api_key: String::new(),
            endpoint: defaults::notifier_endpoint(),
            delay_secs: defaults::notifier_delay(),
        }
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Longer timeout for document downloads
    #[serde(default = "defaults::download_timeout")]
    pub download_timeout_secs: u64,

    /// Maximum detail pages taken from a single listing
    #[serde(default = "defaults::max_processes_per_page")]
    pub max_processes_per_page: usize,

    /// Query parameter that only genuine detail links carry
    #[serde(default = "defaults::detail_link_marker")]
    pub detail_link_marker: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            download_timeout_secs: defaults::download_timeout(),
            max_processes_per_page: defaults::max_processes_per_page(),
            detail_link_marker: defaults::detail_link_marker(),
        }
    }
}

/// DOE-SP search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteConfig {
    /// Run the gazette pass after the portal crawl
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Search API base URL
    #[serde(default = "defaults::gazette_api_base")]
    pub api_base: String,

    /// Public site used to build publication links
    #[serde(default = "defaults::gazette_site_base")]
    pub site_base: String,

    /// Journal ("caderno") to search in
    #[serde(default = "defaults::gazette_journal")]
    pub journal_id: String,

    /// Length of the rolling search window in days
    #[serde(default = "defaults::gazette_search_days")]
    pub search_days: i64,

    /// Results requested per API page
    #[serde(default = "defaults::gazette_page_size")]
    pub page_size: u32,
}

impl Default for GazetteConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            api_base: defaults::gazette_api_base(),
            site_base: defaults::gazette_site_base(),
            journal_id: defaults::gazette_journal(),
            search_days: defaults::gazette_search_days(),
            page_size: defaults::gazette_page_size(),
        }
    }
}

/// History persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding every processed key
    #[serde(default = "defaults::history_file")]
    pub history_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_file: defaults::history_file(),
        }
    }
}

/// A portal page enumerating recruitment processes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSource {
    pub url: String,
    pub label: String,
}

impl ListingSource {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::ListingSource;

    const CPS_BASE: &str = "https://urhsistemas.cps.sp.gov.br";

    pub fn candidate_name() -> String {
        "Renan Bezerra dos Santos".into()
    }

    // Notifier defaults
    pub fn notifier_endpoint() -> String {
        "https://api.callmebot.com/whatsapp.php".into()
    }
    pub fn notifier_delay() -> u64 {
        3
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            .into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn download_timeout() -> u64 {
        60
    }
    pub fn max_processes_per_page() -> usize {
        50
    }
    pub fn detail_link_marker() -> String {
        "oljioahohafnav87412".into()
    }

    // Gazette defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn gazette_api_base() -> String {
        "https://do-api-web-search.doe.sp.gov.br".into()
    }
    pub fn gazette_site_base() -> String {
        "https://www.doe.sp.gov.br".into()
    }
    pub fn gazette_journal() -> String {
        // Caderno "Executivo"
        "ca96256b-6ca1-407f-866e-567ef9430123".into()
    }
    pub fn gazette_search_days() -> i64 {
        30
    }
    pub fn gazette_page_size() -> u32 {
        20
    }

    pub fn history_file() -> PathBuf {
        PathBuf::from("history_pdfs.json")
    }

    pub fn listings() -> Vec<ListingSource> {
        [
            // ETEC
            (
                "/dgsdad/SelecaoPublica/ETEC/PSS/Abertos.aspx",
                "ETEC – Processo Seletivo Docente – Inscrições Abertas",
            ),
            (
                "/dgsdad/SelecaoPublica/ETEC/PSS/Andamento.aspx",
                "ETEC – Processo Seletivo Docente – Em Andamento",
            ),
            (
                "/dgsdad/selecaopublica/ETEC/CPD/Abertos.aspx",
                "ETEC – Concurso Público Docente – Inscrições Abertas",
            ),
            (
                "/dgsdad/selecaopublica/ETEC/CPD/emAndamento.aspx",
                "ETEC – Concurso Público Docente – Em Andamento",
            ),
            (
                "/dgsdad/SelecaoPublica/ETEC/Auxiliar/EmAndamento.aspx",
                "ETEC – Auxiliar de Docente – Em Andamento",
            ),
            // FATEC
            (
                "/dgsdad/SelecaoPublica/FATEC/PSS/inscricoesabertas.aspx",
                "FATEC – Processo Seletivo Docente – Inscrições Abertas",
            ),
            (
                "/dgsdad/SelecaoPublica/FATEC/ProcessoSeletivo/EmAndamento.aspx",
                "FATEC – Processo Seletivo Docente – Em Andamento",
            ),
            (
                "/dgsdad/SelecaoPublica/FATEC/CPD/Abertos.aspx",
                "FATEC – Concurso Público Docente – Inscrições Abertas",
            ),
            (
                "/dgsdad/SelecaoPublica/FATEC/CPD/emAndamento.aspx",
                "FATEC – Concurso Público Docente – Em Andamento",
            ),
            // PSSAD, shared by ETEC and FATEC
            (
                "/dgsdad/SelecaoPublica/PSSAD/Abertos.aspx",
                "PSSAD – Auxiliar de Docente – Inscrições Abertas",
            ),
            (
                "/dgsdad/selecaopublica/PSSAD/emAndamento.aspx",
                "PSSAD – Auxiliar de Docente – Em Andamento",
            ),
        ]
        .into_iter()
        .map(|(path, label)| ListingSource::new(format!("{CPS_BASE}{path}"), label))
        .collect()
    }
}
