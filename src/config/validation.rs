use crate::config::types::{ApiConfig, Config, CrawlerConfig, FetcherConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_crawler_config(&config.crawler)?;
    validate_api_config(&config.api)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.client_name.is_empty() {
        return Err(ConfigError::Validation(
            "client_name cannot be empty".to_string(),
        ));
    }

    if !config
        .client_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "client_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.client_name
        )));
    }

    Ok(())
}

/// Validates download configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_downloads < 1 || config.max_concurrent_downloads > 200 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_downloads must be between 1 and 200, got {}",
            config.max_concurrent_downloads
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.progress_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "progress_interval_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.empty_render_retries > 20 {
        return Err(ConfigError::Validation(format!(
            "empty_render_retries must be <= 20, got {}",
            config.empty_render_retries
        )));
    }

    if config.operation_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "operation_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates remote API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.page_size < 1 || config.page_size > 50 {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and 50, got {}",
            config.page_size
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dest_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "dest_path cannot be empty".to_string(),
        ));
    }

    if !config.extracts_anything() {
        return Err(ConfigError::Validation(
            "nothing to extract: pages, posts, pics and videos are all disabled".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            user_agent: UserAgentConfig::default(),
            fetcher: FetcherConfig::default(),
            crawler: CrawlerConfig::default(),
            api: ApiConfig::default(),
            output: OutputConfig::all("out"),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_valid_config()).is_ok());
    }

    #[test]
    fn test_invalid_concurrency_zero() {
        let mut config = create_valid_config();
        config.fetcher.max_concurrent_downloads = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_concurrency_too_high() {
        let mut config = create_valid_config();
        config.fetcher.max_concurrent_downloads = 201;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_client_name_with_spaces() {
        let mut config = create_valid_config();
        config.user_agent.client_name = "Like Harvester".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = create_valid_config();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_base_url_scheme() {
        let mut config = create_valid_config();
        config.api.base_url = "ftp://api.example.com".to_string();
        assert!(validate(&config).is_err());

        config.api.base_url = "http://127.0.0.1:8080/v2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_page_size() {
        let mut config = create_valid_config();
        config.api.page_size = 0;
        assert!(validate(&config).is_err());
        config.api.page_size = 51;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_nothing_to_extract() {
        let mut config = create_valid_config();
        config.output.pages = false;
        config.output.posts = false;
        config.output.pics = false;
        config.output.videos = false;

        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("nothing to extract"));
    }

    #[test]
    fn test_single_kind_is_enough() {
        let mut config = create_valid_config();
        config.output.pages = false;
        config.output.posts = false;
        config.output.pics = false;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_dest_path() {
        let mut config = create_valid_config();
        config.output.dest_path = "".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_empty_render_retries_allowed() {
        let mut config = create_valid_config();
        config.crawler.empty_render_retries = 0;
        assert!(validate(&config).is_ok());
    }
}
