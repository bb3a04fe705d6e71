use rst_common::standard::serde::{self, Deserialize};

use hubrouter_core::router::invitation::DEFAULT_ROUTER_LABEL;

use crate::common::types::{CommonError, ToValidate};

/// `Router` holds the identity advertised through out-of-band invitations
#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Router {
    pub(super) label: String,
    pub(super) service_endpoint: String,
}

impl Router {
    pub fn get_label(&self) -> String {
        self.label.to_owned()
    }

    pub fn get_service_endpoint(&self) -> String {
        self.service_endpoint.to_owned()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self {
            label: DEFAULT_ROUTER_LABEL.to_string(),
            service_endpoint: "".to_string(),
        }
    }
}

impl ToValidate for Router {
    fn validate(&self) -> Result<(), CommonError> {
        if self.label.is_empty() {
            return Err(CommonError::ValidationError(
                "config: router:label is missing".to_string(),
            ));
        }

        if self.service_endpoint.is_empty() {
            return Err(CommonError::ValidationError(
                "config: router:service_endpoint is missing".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstdev_config::format::use_toml;
    use rstdev_config::parser::from_file;
    use rstdev_config::{types::ConfigError, Builder};

    use crate::common::helpers::{self, fixtures};

    #[test]
    fn test_parse_router_config() -> Result<(), ConfigError> {
        let toml_file = fixtures::fixture_path("config_router.toml");
        let config_router: Router = Builder::new(from_file(toml_file)).fetch()?.parse(use_toml)?;

        assert_eq!(config_router.get_label(), "test-router");
        assert_eq!(
            config_router.get_service_endpoint(),
            "wss://router.example.com/ws"
        );
        Ok(())
    }

    #[test]
    fn test_router_validation_failed() {
        let router = Router::default();
        let validation = helpers::validate(router.clone());
        assert!(validation
            .unwrap_err()
            .to_string()
            .contains("router:service_endpoint"));

        let mut router = router;
        router.service_endpoint = "https://router.example.com".to_string();
        router.label = "".to_string();
        let validation = helpers::validate(router);
        assert!(validation
            .unwrap_err()
            .to_string()
            .contains("router:label"));
    }
}
