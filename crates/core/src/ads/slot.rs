use std::sync::{Arc, PoisonError, RwLock};

use super::AdSdk;
use crate::Capability;

/// A shared place where the advertising SDK shows up once it's loaded.
///
/// The SDK may finish loading long after the mini app started, so the
/// slot is read on every call instead of being resolved once.
#[derive(Clone, Default)]
pub struct AdSdkSlot {
    sdk: Arc<RwLock<Option<Arc<dyn AdSdk>>>>,
}

impl AdSdkSlot {
    /// Creates a slot with no SDK loaded.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a slot with the SDK already loaded.
    #[inline]
    pub fn loaded<A: AdSdk>(sdk: A) -> Self {
        let slot = Self::empty();
        slot.install(sdk);
        slot
    }

    /// Makes the SDK available to every clone of this slot.
    pub fn install<A: AdSdk>(&self, sdk: A) {
        *self.sdk.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::new(sdk));
        debug!("ad sdk installed");
    }

    /// Removes the SDK, e.g. when its script failed.
    pub fn unload(&self) {
        *self.sdk.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the SDK if it's loaded right now.
    #[inline]
    pub fn current(&self) -> Option<Arc<dyn AdSdk>> {
        self.sdk
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl From<Capability<Arc<dyn AdSdk>>> for AdSdkSlot {
    fn from(capability: Capability<Arc<dyn AdSdk>>) -> Self {
        let slot = Self::empty();
        if let Capability::Available(sdk) = capability {
            *slot.sdk.write().unwrap_or_else(PoisonError::into_inner) =
                Some(sdk);
        }
        slot
    }
}
