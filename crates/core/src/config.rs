//! Session configuration.

use std::num::NonZeroU64;
use std::time::Duration;

use crate::cadence::CadencePolicy;

/// The ad-slot identifiers the mini app presents into.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AdSlots {
    /// The persistent banner shown under the chat.
    pub embedded_banner: String,
    /// The full-screen ad shown on cadence.
    pub interstitial_banner: String,
    /// The rewarded video shown on cadence.
    pub interstitial_video: String,
    /// The push-notification opt-in style.
    pub push_style: String,
    /// The container the embedded banner renders into.
    pub banner_container: String,
}

/// What to do with a submit while another message is still in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InFlightPolicy {
    /// Send it anyway. Every send resolves on its own, and replies land
    /// in the transcript in completion order.
    #[default]
    Concurrent,
    /// Ignore it until the pending reply arrives.
    Single,
}

/// Builder for [`ChatConfig`].
#[derive(Clone, Debug, Default)]
pub struct ChatConfigBuilder {
    ad_slots: Option<AdSlots>,
    ad_frequency: Option<NonZeroU64>,
    ads_enabled: Option<bool>,
    in_flight: Option<InFlightPolicy>,
    request_timeout: Option<Option<Duration>>,
}

impl ChatConfigBuilder {
    /// Creates a builder with every option at its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ad-slot identifiers.
    #[inline]
    pub fn with_ad_slots(mut self, ad_slots: AdSlots) -> Self {
        self.ad_slots = Some(ad_slots);
        self
    }

    /// Shows an ad every `frequency` messages. A frequency of zero is
    /// ignored.
    #[inline]
    pub fn with_ad_frequency(mut self, frequency: u64) -> Self {
        match NonZeroU64::new(frequency) {
            Some(frequency) => self.ad_frequency = Some(frequency),
            None => warn!("ignoring zero ad frequency"),
        }
        self
    }

    /// Enables or disables ads altogether.
    #[inline]
    pub fn with_ads_enabled(mut self, enabled: bool) -> Self {
        self.ads_enabled = Some(enabled);
        self
    }

    /// Sets how overlapping sends are handled.
    #[inline]
    pub fn with_in_flight_policy(mut self, policy: InFlightPolicy) -> Self {
        self.in_flight = Some(policy);
        self
    }

    /// Bounds how long a request may stay in flight. `None` waits forever.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ChatConfig {
        ChatConfig {
            ad_slots: self.ad_slots.unwrap_or_default(),
            ad_frequency: self
                .ad_frequency
                .unwrap_or(CadencePolicy::DEFAULT_FREQUENCY),
            ads_enabled: self.ads_enabled.unwrap_or(true),
            in_flight: self.in_flight.unwrap_or_default(),
            request_timeout: self
                .request_timeout
                .unwrap_or(Some(ChatConfig::DEFAULT_REQUEST_TIMEOUT)),
        }
    }
}

/// Configuration of a chat session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatConfig {
    pub(crate) ad_slots: AdSlots,
    pub(crate) ad_frequency: NonZeroU64,
    pub(crate) ads_enabled: bool,
    pub(crate) in_flight: InFlightPolicy,
    pub(crate) request_timeout: Option<Duration>,
}

impl ChatConfig {
    /// How long a request may stay in flight unless configured otherwise.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Returns the ad-slot identifiers.
    #[inline]
    pub fn ad_slots(&self) -> &AdSlots {
        &self.ad_slots
    }

    /// Returns `true` if ads are enabled.
    #[inline]
    pub fn ads_enabled(&self) -> bool {
        self.ads_enabled
    }

    /// Returns how overlapping sends are handled.
    #[inline]
    pub fn in_flight_policy(&self) -> InFlightPolicy {
        self.in_flight
    }

    /// Returns the request timeout.
    #[inline]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Returns the ad cadence this configuration describes.
    #[inline]
    pub fn cadence(&self) -> CadencePolicy {
        if self.ads_enabled {
            CadencePolicy::every(self.ad_frequency)
        } else {
            CadencePolicy::disabled()
        }
    }
}

impl Default for ChatConfig {
    #[inline]
    fn default() -> Self {
        ChatConfigBuilder::new().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChatConfig::default();
        assert!(config.ads_enabled());
        assert_eq!(config.in_flight_policy(), InFlightPolicy::Concurrent);
        assert_eq!(
            config.request_timeout(),
            Some(ChatConfig::DEFAULT_REQUEST_TIMEOUT)
        );
        assert_eq!(config.cadence(), CadencePolicy::default());
    }

    #[test]
    fn test_overrides() {
        let config = ChatConfigBuilder::new()
            .with_ad_frequency(5)
            .with_ad_frequency(0)
            .with_in_flight_policy(InFlightPolicy::Single)
            .with_request_timeout(None)
            .build();
        assert!(config.cadence().is_due(5));
        assert!(!config.cadence().is_due(3));
        assert_eq!(config.in_flight_policy(), InFlightPolicy::Single);
        assert_eq!(config.request_timeout(), None);

        let config = ChatConfigBuilder::new().with_ads_enabled(false).build();
        assert_eq!(config.cadence(), CadencePolicy::disabled());
    }
}
