use anyhow::Context;
use sf_paging::MIN_BUTTONS;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_PAGE_BUTTONS: u32 = 5;
const DEFAULT_MAX_PAGE_BUTTONS_LIMIT: u32 = 25;

/// Service settings read from the environment at start-up.
///
/// - `STOREFRONT_BIND_ADDR` (default `0.0.0.0:8080`)
/// - `STOREFRONT_MAX_PAGE_BUTTONS` (default `5`, never below 3)
/// - `STOREFRONT_MAX_PAGE_BUTTONS_LIMIT` (default `25`): largest `max_buttons`
///   a request may ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) max_page_buttons: u32,
    pub(crate) max_page_buttons_limit: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            max_page_buttons: DEFAULT_MAX_PAGE_BUTTONS,
            max_page_buttons_limit: DEFAULT_MAX_PAGE_BUTTONS_LIMIT,
        }
    }
}

impl ServiceConfig {
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("STOREFRONT_BIND_ADDR")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .with_context(|| format!("invalid STOREFRONT_BIND_ADDR: {bind_addr}"))?;

        let max_page_buttons = parse_u32(&lookup, "STOREFRONT_MAX_PAGE_BUTTONS")?
            .unwrap_or(DEFAULT_MAX_PAGE_BUTTONS)
            .max(MIN_BUTTONS);
        let max_page_buttons_limit = parse_u32(&lookup, "STOREFRONT_MAX_PAGE_BUTTONS_LIMIT")?
            .unwrap_or(DEFAULT_MAX_PAGE_BUTTONS_LIMIT)
            .max(MIN_BUTTONS);

        anyhow::ensure!(
            max_page_buttons <= max_page_buttons_limit,
            "STOREFRONT_MAX_PAGE_BUTTONS ({max_page_buttons}) exceeds STOREFRONT_MAX_PAGE_BUTTONS_LIMIT ({max_page_buttons_limit})"
        );

        Ok(Self {
            bind_addr,
            max_page_buttons,
            max_page_buttons_limit,
        })
    }
}

fn parse_u32(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<u32>> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u32>()
            .map(Some)
            .with_context(|| format!("invalid {key}: {raw}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<ServiceConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        ServiceConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() -> anyhow::Result<()> {
        assert_eq!(config_from(&[])?, ServiceConfig::default());
        Ok(())
    }

    #[test]
    fn reads_overrides() -> anyhow::Result<()> {
        let config = config_from(&[
            ("STOREFRONT_BIND_ADDR", "127.0.0.1:9000"),
            ("STOREFRONT_MAX_PAGE_BUTTONS", "7"),
        ])?;
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.max_page_buttons, 7);
        assert_eq!(config.max_page_buttons_limit, 25);
        Ok(())
    }

    #[test]
    fn default_button_count_must_fit_the_limit() -> anyhow::Result<()> {
        let config = config_from(&[
            ("STOREFRONT_MAX_PAGE_BUTTONS", "9"),
            ("STOREFRONT_MAX_PAGE_BUTTONS_LIMIT", "9"),
        ])?;
        assert_eq!(config.max_page_buttons_limit, 9);

        assert!(
            config_from(&[
                ("STOREFRONT_MAX_PAGE_BUTTONS", "12"),
                ("STOREFRONT_MAX_PAGE_BUTTONS_LIMIT", "9"),
            ])
            .is_err()
        );
        Ok(())
    }

    #[test]
    fn max_page_buttons_never_drops_below_three() -> anyhow::Result<()> {
        let config = config_from(&[("STOREFRONT_MAX_PAGE_BUTTONS", "1")])?;
        assert_eq!(config.max_page_buttons, 3);
        Ok(())
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(config_from(&[("STOREFRONT_BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config_from(&[("STOREFRONT_MAX_PAGE_BUTTONS", "many")]).is_err());
        assert!(config_from(&[("STOREFRONT_MAX_PAGE_BUTTONS_LIMIT", "-1")]).is_err());
    }
}
