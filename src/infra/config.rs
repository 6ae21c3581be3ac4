use anyhow::Context;
use camino::Utf8PathBuf;
use config::Config;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Clone, Deserialize, Debug)]
pub struct Settings {
    pub environment: String,
    pub application: ServerSettings,
    pub database: DatabaseSettings,
    pub orders: OrderSettings,
    pub users: UserSettings,
}

#[derive(Clone, Deserialize, Debug)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub logs_directory: String,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", &self.host, &self.port)
    }

    /// Where the storefront's order gateway reaches this server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address())
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn without_db_name(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(&self.password)
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db_name(&self) -> PgConnectOptions {
        self.without_db_name().database(&self.database_name)
    }
}

/// Settings shared by order placement and the admin dashboard.
#[derive(Clone, Deserialize, Debug)]
pub struct OrderSettings {
    /// Flat fee added to every order. Submitted totals must include it.
    pub shipping_fee: Decimal,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub recent_orders_limit: i64,
}

#[derive(Clone, Deserialize, Debug)]
pub struct UserSettings {
    /// bcrypt work factor for new password hashes.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub password_hash_cost: u32,
    /// Accounts registered with one of these emails manage the catalog and see the dashboard.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl UserSettings {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(email.trim()))
    }
}

fn find_config_dir() -> anyhow::Result<Utf8PathBuf> {
    let current_dir =
        std::env::current_dir().context("Failed to determine the current directory.")?;
    let current_dir =
        Utf8PathBuf::try_from(current_dir).context("Could not convert PathBuf to Utf8PathBuf")?;

    let config_dir = current_dir
        .ancestors()
        .map(|p| p.join("config"))
        .find(|p| {
            let base_path = p.join("base.yaml");
            p.is_dir() && base_path.is_file()
        })
        .ok_or_else(|| anyhow::anyhow!("Cannot find config directory!"))?;

    config_dir
        .canonicalize_utf8()
        .with_context(|| format!("Could not canonicalize config directory {config_dir}"))
}

pub fn get_config_settings() -> anyhow::Result<Settings> {
    let config_directory = find_config_dir()?;

    // Detect the running environment - default to `development` if unspecified.
    let environment: String =
        std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_owned());

    let base_source = config::File::from(config_directory.join("base").into_std_path_buf()).required(true);

    let env_source =
        config::File::from(config_directory.join(environment.as_str()).into_std_path_buf()).required(true);

    // Overrides from environment variables with a prefix of APP and '__' as separator,
    // e.g. `APP_ORDERS__SHIPPING_FEE=5.99` sets `Settings.orders.shipping_fee`.
    let overrides_source = config::Environment::with_prefix("app").separator("__");

    let config = Config::builder()
        .add_source(base_source)
        .add_source(env_source)
        .add_source(overrides_source)
        .build()?;

    config
        .try_deserialize()
        .context("Could not deserialise config settings.")
}
