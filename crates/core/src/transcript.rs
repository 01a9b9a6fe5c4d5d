//! Transcript-related types.

use std::fmt::{self, Display};
use std::sync::Arc;

/// Who a transcript entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person typing into the mini app.
    User,
    /// The chat-completion service.
    Assistant,
}

/// How an entry should look.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryStyle {
    /// A message typed by the user.
    User,
    /// A reply from the assistant.
    Assistant,
    /// A transient indicator shown while waiting for a reply.
    Pending,
}

/// An entry in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MessageEntry {
    /// Who the entry belongs to.
    pub role: Role,
    /// The text of the entry.
    pub text: String,
    /// Whether this is a pending placeholder.
    pub pending: bool,
}

impl MessageEntry {
    /// Creates a user entry.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            pending: false,
        }
    }

    /// Creates an assistant entry.
    #[inline]
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            pending: false,
        }
    }

    /// Creates a pending placeholder.
    #[inline]
    pub fn pending<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            pending: true,
        }
    }

    /// Returns how this entry should look.
    #[inline]
    pub fn style(&self) -> EntryStyle {
        match (self.role, self.pending) {
            (_, true) => EntryStyle::Pending,
            (Role::User, false) => EntryStyle::User,
            (Role::Assistant, false) => EntryStyle::Assistant,
        }
    }
}

impl Display for MessageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style() {
            EntryStyle::User => write!(f, "You: {}", self.text),
            EntryStyle::Assistant => write!(f, "Assistant: {}", self.text),
            EntryStyle::Pending => write!(f, "{}", self.text),
        }
    }
}

/// Identifies one appended entry, so that it can be removed later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(u64);

/// The visible side of a transcript.
///
/// Renderers are told about every append and removal, in order. After an
/// append they are asked to bring the newest entry into view.
pub trait TranscriptRenderer: Send + Sync + 'static {
    /// An entry was appended at the end.
    fn entry_appended(&self, handle: EntryHandle, entry: &MessageEntry);

    /// A previously appended entry was removed.
    fn entry_removed(&self, handle: EntryHandle);

    /// Scrolls to the newest entry.
    fn scroll_to_end(&self) {}
}

/// A renderer that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl TranscriptRenderer for NullRenderer {
    #[inline]
    fn entry_appended(&self, _handle: EntryHandle, _entry: &MessageEntry) {}

    #[inline]
    fn entry_removed(&self, _handle: EntryHandle) {}
}

/// An append-only transcript.
///
/// Entries are never reordered or edited in place. The only mutations
/// are appending an entry and removing a single entry entirely.
pub struct TranscriptView {
    entries: Vec<(EntryHandle, MessageEntry)>,
    next_id: u64,
    renderer: Arc<dyn TranscriptRenderer>,
}

impl TranscriptView {
    /// Creates an empty transcript drawing to the given renderer.
    #[inline]
    pub fn new(renderer: Arc<dyn TranscriptRenderer>) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            renderer,
        }
    }

    /// Appends an entry and scrolls to it.
    pub fn append_entry(&mut self, entry: MessageEntry) -> EntryHandle {
        let handle = EntryHandle(self.next_id);
        self.next_id += 1;

        self.renderer.entry_appended(handle, &entry);
        self.renderer.scroll_to_end();
        self.entries.push((handle, entry));
        handle
    }

    /// Removes a previously appended entry.
    ///
    /// Returns `false` if the entry is already gone.
    pub fn remove_entry(&mut self, handle: EntryHandle) -> bool {
        // Handles are allocated in increasing order, so the entries are
        // sorted by handle.
        let Ok(idx) = self.entries.binary_search_by_key(&handle, |(h, _)| *h)
        else {
            return false;
        };
        self.entries.remove(idx);
        self.renderer.entry_removed(handle);
        true
    }

    /// Returns the entries in display order.
    #[inline]
    pub fn entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    /// Returns the last entry.
    #[inline]
    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.last().map(|(_, entry)| entry)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TranscriptView {
    #[inline]
    fn default() -> Self {
        Self::new(Arc::new(NullRenderer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingRenderer, RenderEvent};

    #[test]
    fn test_styles() {
        assert_eq!(MessageEntry::user("hi").style(), EntryStyle::User);
        assert_eq!(
            MessageEntry::assistant("hello").style(),
            EntryStyle::Assistant
        );
        assert_eq!(
            MessageEntry::pending("Thinking...").style(),
            EntryStyle::Pending
        );
        assert_eq!(MessageEntry::user("hi").to_string(), "You: hi");
        assert_eq!(
            MessageEntry::assistant("hello").to_string(),
            "Assistant: hello"
        );
    }

    #[test]
    fn test_append_and_remove() {
        let renderer = RecordingRenderer::default();
        let mut view = TranscriptView::new(Arc::new(renderer.clone()));

        let user = view.append_entry(MessageEntry::user("one"));
        let pending = view.append_entry(MessageEntry::pending("..."));
        view.append_entry(MessageEntry::user("two"));

        assert!(view.remove_entry(pending));
        assert!(!view.remove_entry(pending));

        let texts: Vec<&str> =
            view.entries().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(view.len(), 2);
        assert_eq!(view.last(), Some(&MessageEntry::user("two")));

        assert!(view.remove_entry(user));
        assert_eq!(view.len(), 1);

        assert_eq!(
            renderer.events(),
            vec![
                RenderEvent::Appended(MessageEntry::user("one")),
                RenderEvent::Scrolled,
                RenderEvent::Appended(MessageEntry::pending("...")),
                RenderEvent::Scrolled,
                RenderEvent::Appended(MessageEntry::user("two")),
                RenderEvent::Scrolled,
                RenderEvent::Removed(pending),
                RenderEvent::Removed(user),
            ]
        );
    }

    #[test]
    fn test_empty_view() {
        let mut view = TranscriptView::default();
        assert!(view.is_empty());
        assert!(view.last().is_none());
        let handle = view.append_entry(MessageEntry::assistant("hi"));
        assert!(view.remove_entry(handle));
        assert!(view.is_empty());
    }
}
