//! Settings of the terminal front-end, read from the environment.

use std::error::Error;
use std::fmt::{self, Display};
use std::time::Duration;

use miniapp_chat::core::config::{AdSlots, ChatConfig, ChatConfigBuilder};

const DEFAULT_CHAT_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_BANNER_CONTAINER: &str = "embedded-banner";

#[derive(Debug)]
pub struct SettingsError {
    key: &'static str,
    value: String,
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.key, self.value)
    }
}

impl Error for SettingsError {}

#[derive(Debug)]
pub struct Settings {
    pub chat_url: String,
    pub user_id: Option<String>,
    pub config: ChatConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let ad_slots = AdSlots {
            embedded_banner: var("AD_EMBEDDED_BANNER_ID").unwrap_or_default(),
            interstitial_banner: var("AD_INTERSTITIAL_BANNER_ID")
                .unwrap_or_default(),
            interstitial_video: var("AD_INTERSTITIAL_VIDEO_ID")
                .unwrap_or_default(),
            push_style: var("AD_PUSH_STYLE_ID").unwrap_or_default(),
            banner_container: var("AD_BANNER_CONTAINER")
                .unwrap_or_else(|| DEFAULT_BANNER_CONTAINER.to_owned()),
        };
        let mut builder = ChatConfigBuilder::new().with_ad_slots(ad_slots);

        // Anything but "true" turns ads off.
        if let Some(enabled) = var("AD_ENABLED") {
            builder =
                builder.with_ads_enabled(enabled.eq_ignore_ascii_case("true"));
        }
        if let Some(frequency) = var("AD_FREQUENCY") {
            builder = builder
                .with_ad_frequency(parse_u64("AD_FREQUENCY", frequency)?);
        }
        if let Some(secs) = var("CHAT_REQUEST_TIMEOUT_SECS") {
            let timeout = match parse_u64("CHAT_REQUEST_TIMEOUT_SECS", secs)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
            builder = builder.with_request_timeout(timeout);
        }

        Ok(Self {
            chat_url: var("MINIAPP_CHAT_URL")
                .unwrap_or_else(|| DEFAULT_CHAT_URL.to_owned()),
            user_id: var("MINIAPP_USER_ID"),
            config: builder.build(),
        })
    }
}

fn parse_u64(key: &'static str, value: String) -> Result<u64, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError { key, value })
}
