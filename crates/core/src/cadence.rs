use std::num::NonZeroU64;

use rand::Rng;

/// The ad format picked when the cadence fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdPick {
    /// A full-screen ad.
    Interstitial,
    /// A rewarded video ad.
    Video,
}

/// What the cadence decided for a message count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdDecision {
    /// No ad this time.
    Skip,
    /// Present an ad of the given format.
    Show(AdPick),
}

/// Decides how often, by message count, an ad is shown.
///
/// An ad is due when the count is a multiple of the frequency. The
/// format is then picked between interstitial and video with even odds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CadencePolicy {
    every: NonZeroU64,
    enabled: bool,
}

impl CadencePolicy {
    /// The default frequency: an ad every third message.
    pub const DEFAULT_FREQUENCY: NonZeroU64 = NonZeroU64::new(3).unwrap();

    /// Creates an enabled policy with the given frequency.
    #[inline]
    pub fn every(every: NonZeroU64) -> Self {
        Self {
            every,
            enabled: true,
        }
    }

    /// Creates a policy that never shows ads.
    #[inline]
    pub fn disabled() -> Self {
        Self {
            every: Self::DEFAULT_FREQUENCY,
            enabled: false,
        }
    }

    /// Returns `true` if an ad is due after `messages_sent` messages.
    #[inline]
    pub fn is_due(&self, messages_sent: u64) -> bool {
        self.enabled
            && messages_sent != 0
            && messages_sent % self.every.get() == 0
    }

    /// Decides whether and which ad to show after `messages_sent`
    /// messages.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        messages_sent: u64,
        rng: &mut R,
    ) -> AdDecision {
        if !self.is_due(messages_sent) {
            return AdDecision::Skip;
        }
        if rng.gen_bool(0.5) {
            AdDecision::Show(AdPick::Interstitial)
        } else {
            AdDecision::Show(AdPick::Video)
        }
    }
}

impl Default for CadencePolicy {
    #[inline]
    fn default() -> Self {
        Self::every(Self::DEFAULT_FREQUENCY)
    }
}
