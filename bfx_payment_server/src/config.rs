use std::{env, time::Duration};

use bfx_tools::BfxConfig;
use log::*;

use crate::errors::ServerError;

const DEFAULT_BPG_HOST: &str = "127.0.0.1";
const DEFAULT_BPG_PORT: u16 = 8380;
/// One second short of 24 hours, the processor's default invoice lifetime.
const DEFAULT_INVOICE_DURATION_SECS: u32 = 86_399;
const DEFAULT_REDIRECT_URL_BASE: &str = "https://pay.bitfinex.com/gateway/order/";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Credentials and endpoint for the remote payment processor.
    pub bfx: BfxConfig,
    /// Merchant-side invoice parameters.
    pub payment: PaymentOptions,
    /// How often the reconciliation sweep runs. 15 minutes in production.
    pub poll_interval: Duration,
}

/// Merchant configuration for invoice creation. No secrets in here, so it can be passed around freely.
#[derive(Clone, Debug)]
pub struct PaymentOptions {
    /// The crypto currencies customers may pay with.
    pub pay_currencies: Vec<String>,
    /// The fiat currency invoices are denominated in.
    pub currency: String,
    /// Invoice lifetime in seconds.
    pub duration_secs: u32,
    /// The publicly reachable URL of this server's webhook route, handed to the processor per invoice.
    pub webhook_url: String,
    /// Base of the per-order thank-you URL the customer lands on after paying; the order id is appended.
    pub return_url_base: String,
    /// Base of the processor's hosted payment page; the invoice id is appended to build the checkout redirect.
    pub redirect_url_base: String,
}

impl Default for PaymentOptions {
    fn default() -> Self {
        Self {
            pay_currencies: vec!["BTC".to_string()],
            currency: "USD".to_string(),
            duration_secs: DEFAULT_INVOICE_DURATION_SECS,
            webhook_url: String::default(),
            return_url_base: String::default(),
            redirect_url_base: DEFAULT_REDIRECT_URL_BASE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load the full server configuration from the environment.
    ///
    /// Most values fall back to defaults with a log entry; missing API credentials are a configuration error and
    /// abort startup, since every signed call would be rejected anyway.
    pub fn try_from_env() -> Result<Self, ServerError> {
        let host = env::var("BPG_HOST").ok().unwrap_or_else(|| DEFAULT_BPG_HOST.into());
        let port = env::var("BPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🔧️ {s} is not a valid port for BPG_PORT. {e} Using the default, {DEFAULT_BPG_PORT}, instead.");
                    DEFAULT_BPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BPG_PORT);
        let bfx = BfxConfig::new_from_env_or_default();
        if !bfx.has_credentials() {
            return Err(ServerError::ConfigurationError(
                "BFX_API_KEY and BFX_API_SECRET must both be set. Refusing to start without processor credentials."
                    .to_string(),
            ));
        }
        let payment = PaymentOptions::from_env_or_default(&host, port);
        let poll_interval = env::var("BPG_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>().map_err(|e| warn!("🔧️ Invalid BPG_POLL_INTERVAL_SECS value ({s}). {e}")).ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        Ok(Self { host, port, bfx, payment, poll_interval })
    }
}

impl PaymentOptions {
    pub fn from_env_or_default(host: &str, port: u16) -> Self {
        let pay_currencies = env::var("BPG_PAY_CURRENCIES")
            .map(|s| s.split(',').map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect::<Vec<_>>())
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| {
                warn!("🔧️ BPG_PAY_CURRENCIES not set, accepting BTC only");
                vec!["BTC".to_string()]
            });
        let currency = env::var("BPG_CURRENCY").unwrap_or_else(|_| {
            info!("🔧️ BPG_CURRENCY not set, using USD");
            "USD".to_string()
        });
        let duration_secs = env::var("BPG_INVOICE_DURATION_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u32>().map_err(|e| warn!("🔧️ Invalid BPG_INVOICE_DURATION_SECS value ({s}). {e}")).ok()
            })
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_INVOICE_DURATION_SECS);
        let webhook_url = env::var("BPG_WEBHOOK_URL").unwrap_or_else(|_| {
            let url = format!("http://{host}:{port}/webhook/bitfinex");
            warn!("🔧️ BPG_WEBHOOK_URL not set. Using {url}, which the processor can only reach in local testing.");
            url
        });
        let return_url_base = env::var("BPG_RETURN_URL_BASE").unwrap_or_else(|_| {
            warn!("🔧️ BPG_RETURN_URL_BASE not set. Customers will not be redirected back to a thank-you page.");
            String::default()
        });
        let redirect_url_base = env::var("BPG_REDIRECT_URL_BASE").unwrap_or_else(|_| {
            info!("🔧️ BPG_REDIRECT_URL_BASE not set, using {DEFAULT_REDIRECT_URL_BASE}");
            DEFAULT_REDIRECT_URL_BASE.to_string()
        });
        Self { pay_currencies, currency, duration_secs, webhook_url, return_url_base, redirect_url_base }
    }
}
