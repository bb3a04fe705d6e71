use rst_common::standard::serde::{self, Deserialize};

use crate::common::types::{CommonError, ToValidate};

use super::{App, Confirmation, Router};

#[derive(Deserialize, Debug, Clone)]
#[serde(crate = "self::serde")]
pub struct Config {
    pub(super) app: App,
    pub(super) router: Router,

    #[serde(default)]
    pub(super) confirmation: Confirmation,
}

impl Config {
    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn confirmation(&self) -> &Confirmation {
        &self.confirmation
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: App::default(),
            router: Router::default(),
            confirmation: Confirmation::default(),
        }
    }
}

impl ToValidate for Config {
    fn validate(&self) -> Result<(), CommonError> {
        _ = self.app.validate()?;
        _ = self.router.validate()?;
        _ = self.confirmation.validate()?;

        Ok(())
    }
}
