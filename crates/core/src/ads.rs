//! Advertising supports.
//!
//! The advertising SDK exposes a single polymorphic "present" operation
//! (described by [`AdSdk`]). [`AdPresenter`] wraps it with one method per
//! ad format and hands the outcome back through an [`AdTicket`] instead
//! of blocking the caller.

mod presenter;
mod slot;

use std::fmt::{self, Debug};

use tokio::sync::oneshot;

pub use presenter::{AdPresenter, AdTicket};
pub use slot::AdSdkSlot;

/// The advertising SDK.
pub trait AdSdk: Send + Sync + 'static {
    /// Requests an ad to be presented.
    ///
    /// The display happens asynchronously. Implementations report how it
    /// ended through the request's completion, if it has one.
    fn present(&self, request: AdRequest);

    /// Requests push-notification opt-in with the given style.
    fn push_opt_in(&self, style_id: &str);
}

/// The format of an ad.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AdFormat {
    /// A persistent banner rendered into a named container.
    Banner {
        /// The container to render into.
        container_id: String,
    },
    /// A full-screen ad.
    Interstitial,
    /// A rewarded video ad.
    Video,
}

impl AdFormat {
    /// Returns the format name used by the advertising SDK.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            AdFormat::Banner { .. } => "banner",
            AdFormat::Interstitial => "interstitial",
            AdFormat::Video => "video",
        }
    }
}

/// How a presented ad ended.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AdOutcome {
    /// The user closed the ad.
    Closed,
    /// The user watched the ad to the end.
    Completed,
    /// The ad couldn't be presented.
    Failed(String),
}

/// A request passed to [`AdSdk::present`].
#[derive(Debug)]
pub struct AdRequest {
    /// The format to present.
    pub format: AdFormat,
    /// The ad-slot identifier.
    pub slot_id: String,
    /// Where the outcome should be reported. Banners have none.
    pub completion: Option<AdCompletion>,
}

/// The callback side of an [`AdTicket`].
///
/// Consuming methods guarantee an ad reports at most one outcome.
/// Dropping the completion without calling any of them reports nothing.
pub struct AdCompletion {
    outcome_tx: oneshot::Sender<AdOutcome>,
}

impl AdCompletion {
    #[inline]
    pub(crate) fn new() -> (Self, oneshot::Receiver<AdOutcome>) {
        let (outcome_tx, outcome_rx) = oneshot::channel();
        (Self { outcome_tx }, outcome_rx)
    }

    /// Reports that the user closed the ad.
    #[inline]
    pub fn closed(self) {
        self.report(AdOutcome::Closed);
    }

    /// Reports that the user watched the ad to the end.
    #[inline]
    pub fn completed(self) {
        self.report(AdOutcome::Completed);
    }

    /// Reports that the ad failed.
    #[inline]
    pub fn failed<S: Into<String>>(self, detail: S) {
        self.report(AdOutcome::Failed(detail.into()));
    }

    #[inline]
    fn report(self, outcome: AdOutcome) {
        // Nobody may be waiting for the ticket anymore.
        self.outcome_tx.send(outcome).ok();
    }
}

impl Debug for AdCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdCompletion").finish_non_exhaustive()
    }
}
