use tokio::sync::oneshot;

use super::{AdCompletion, AdFormat, AdOutcome, AdRequest, AdSdkSlot};

/// Presents ads through whatever SDK is in the slot at call time.
///
/// If no SDK is loaded, every method does nothing and no ticket is
/// handed out. Nothing here ever blocks on the ad being displayed.
#[derive(Clone, Default)]
pub struct AdPresenter {
    slot: AdSdkSlot,
}

impl AdPresenter {
    /// Creates a presenter reading from the given slot.
    #[inline]
    pub fn new(slot: AdSdkSlot) -> Self {
        Self { slot }
    }

    /// Returns the slot this presenter reads from.
    #[inline]
    pub fn slot(&self) -> &AdSdkSlot {
        &self.slot
    }

    /// Requests a persistent banner in the named container.
    pub fn show_banner(&self, slot_id: &str, container_id: &str) {
        let format = AdFormat::Banner {
            container_id: container_id.to_owned(),
        };
        let Some(sdk) = self.slot.current() else {
            trace!("ad sdk not loaded, skipping banner");
            return;
        };
        sdk.present(AdRequest {
            format,
            slot_id: slot_id.to_owned(),
            completion: None,
        });
    }

    /// Requests a full-screen ad.
    ///
    /// The ticket resolves to [`AdOutcome::Closed`] or
    /// [`AdOutcome::Failed`].
    #[inline]
    pub fn show_interstitial(&self, slot_id: &str) -> Option<AdTicket> {
        self.present(AdFormat::Interstitial, slot_id)
    }

    /// Requests a rewarded video ad.
    ///
    /// The ticket resolves to [`AdOutcome::Completed`] or
    /// [`AdOutcome::Failed`]. Rewarding the user is up to the caller.
    #[inline]
    pub fn show_video(&self, slot_id: &str) -> Option<AdTicket> {
        self.present(AdFormat::Video, slot_id)
    }

    /// Requests push-notification opt-in.
    pub fn request_push_opt_in(&self, style_id: &str) {
        if let Some(sdk) = self.slot.current() {
            sdk.push_opt_in(style_id);
        }
    }

    fn present(&self, format: AdFormat, slot_id: &str) -> Option<AdTicket> {
        let Some(sdk) = self.slot.current() else {
            trace!("ad sdk not loaded, skipping {}", format.name());
            return None;
        };
        let (completion, outcome_rx) = AdCompletion::new();
        sdk.present(AdRequest {
            format: format.clone(),
            slot_id: slot_id.to_owned(),
            completion: Some(completion),
        });
        Some(AdTicket { format, outcome_rx })
    }
}

/// A handle to an ad being presented.
#[derive(Debug)]
pub struct AdTicket {
    format: AdFormat,
    outcome_rx: oneshot::Receiver<AdOutcome>,
}

impl AdTicket {
    /// Returns the format of the ad.
    #[inline]
    pub fn format(&self) -> &AdFormat {
        &self.format
    }

    /// Waits for the ad to end.
    ///
    /// Returns `None` if the SDK dropped the request without reporting.
    #[inline]
    pub async fn outcome(self) -> Option<AdOutcome> {
        self.outcome_rx.await.ok()
    }
}
