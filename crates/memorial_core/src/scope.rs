//! View-scoped document configuration.
//!
//! # Responsibility
//! - Model the document-wide settings a view touches (root classes, meta tags).
//! - Apply them on view entry and revert them when the view's guard drops.
//!
//! # Invariants
//! - Every change made through a [`ViewGuard`] is undone when it drops.
//! - Root classes are reference counted, so overlapping views keep a class
//!   until the last one leaves.
//! - Listeners registered through a [`ListenerSet`] are deregistered in full
//!   when the set drops.

use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DARK_MODE_CLASS: &str = "dark";
pub const META_DESCRIPTION: &str = "description";

#[derive(Debug, Clone, PartialEq, Eq)]
struct MetaTag {
    id: u64,
    name: String,
    content: String,
}

/// Host event a view subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    Resize,
    KeyDown,
    MediaPlay,
    MediaPause,
    MediaEnded,
}

#[derive(Debug, Default)]
struct DocumentState {
    root_classes: BTreeMap<String, usize>,
    meta_tags: Vec<MetaTag>,
    next_meta_id: u64,
    listeners: BTreeMap<u64, (&'static str, ListenerKind)>,
    next_listener_id: u64,
}

/// What a view applies to the document while it is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub view: &'static str,
    pub dark_mode: bool,
    pub meta_description: Option<String>,
}

/// Shared handle to the host document.
#[derive(Debug, Clone, Default)]
pub struct DocumentShell {
    state: Arc<Mutex<DocumentState>>,
}

impl DocumentShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `config` and returns the guard that reverts it.
    pub fn enter_view(&self, config: ViewConfig) -> ViewGuard {
        let mut state = self.lock();

        let class = config.dark_mode.then(|| DARK_MODE_CLASS.to_string());
        if let Some(class) = &class {
            *state.root_classes.entry(class.clone()).or_default() += 1;
        }

        let meta_id = config.meta_description.map(|content| {
            state.next_meta_id += 1;
            let id = state.next_meta_id;
            state.meta_tags.push(MetaTag {
                id,
                name: META_DESCRIPTION.to_string(),
                content,
            });
            id
        });

        debug!("event=view_enter module=scope view={}", config.view);
        ViewGuard {
            shell: self.clone(),
            view: config.view,
            class,
            meta_id,
        }
    }

    pub fn has_root_class(&self, class: &str) -> bool {
        self.lock().root_classes.contains_key(class)
    }

    /// Content of the most recently inserted meta tag named `name`.
    pub fn meta_content(&self, name: &str) -> Option<String> {
        self.lock()
            .meta_tags
            .iter()
            .rev()
            .find(|tag| tag.name == name)
            .map(|tag| tag.content.clone())
    }

    pub fn meta_tag_count(&self) -> usize {
        self.lock().meta_tags.len()
    }

    /// Opens an empty listener registry owned by `view`.
    pub fn listeners(&self, view: &'static str) -> ListenerSet {
        ListenerSet {
            shell: self.clone(),
            view,
            ids: Vec::new(),
        }
    }

    /// Listeners currently registered across all views.
    pub fn active_listeners(&self) -> Vec<(&'static str, ListenerKind)> {
        self.lock().listeners.values().copied().collect()
    }

    fn lock(&self) -> MutexGuard<'_, DocumentState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Active view's hold on the document. Reverts on drop.
#[derive(Debug)]
pub struct ViewGuard {
    shell: DocumentShell,
    view: &'static str,
    class: Option<String>,
    meta_id: Option<u64>,
}

impl ViewGuard {
    pub fn view(&self) -> &'static str {
        self.view
    }
}

impl Drop for ViewGuard {
    fn drop(&mut self) {
        let mut state = self.shell.lock();
        if let Some(class) = self.class.take() {
            if let Some(count) = state.root_classes.get_mut(&class) {
                *count -= 1;
                if *count == 0 {
                    state.root_classes.remove(&class);
                }
            }
        }
        if let Some(id) = self.meta_id.take() {
            state.meta_tags.retain(|tag| tag.id != id);
        }
        debug!("event=view_exit module=scope view={}", self.view);
    }
}

/// Opaque handle of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listeners a view registered with the host.
#[derive(Debug)]
pub struct ListenerSet {
    shell: DocumentShell,
    view: &'static str,
    ids: Vec<(ListenerId, ListenerKind)>,
}

impl ListenerSet {
    pub fn register(&mut self, kind: ListenerKind) -> ListenerId {
        let mut state = self.shell.lock();
        state.next_listener_id += 1;
        let id = ListenerId(state.next_listener_id);
        state.listeners.insert(id.0, (self.view, kind));
        self.ids.push((id, kind));
        id
    }

    pub fn is_registered(&self, kind: ListenerKind) -> bool {
        self.ids.iter().any(|(_, registered)| *registered == kind)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Deregisters everything. Returns how many listeners were removed.
    pub fn clear(&mut self) -> usize {
        if self.ids.is_empty() {
            return 0;
        }
        let mut state = self.shell.lock();
        let removed = self.ids.len();
        for (id, _) in self.ids.drain(..) {
            state.listeners.remove(&id.0);
        }
        debug!(
            "event=listeners_released module=scope view={} count={removed}",
            self.view
        );
        removed
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DocumentShell, ListenerKind, ViewConfig, DARK_MODE_CLASS, META_DESCRIPTION,
    };

    fn config(view: &'static str, description: &str) -> ViewConfig {
        ViewConfig {
            view,
            dark_mode: true,
            meta_description: Some(description.to_string()),
        }
    }

    #[test]
    fn guard_reverts_on_drop() {
        let shell = DocumentShell::new();
        let guard = shell.enter_view(config("home", "Memorial"));
        assert!(shell.has_root_class(DARK_MODE_CLASS));
        assert_eq!(
            shell.meta_content(META_DESCRIPTION).as_deref(),
            Some("Memorial")
        );

        drop(guard);
        assert!(!shell.has_root_class(DARK_MODE_CLASS));
        assert_eq!(shell.meta_tag_count(), 0);
    }

    #[test]
    fn overlapping_views_keep_class_until_last_exit() {
        let shell = DocumentShell::new();
        let home = shell.enter_view(config("home", "Memorial"));
        let timeline = shell.enter_view(config("timeline", "Linha do tempo"));
        assert_eq!(
            shell.meta_content(META_DESCRIPTION).as_deref(),
            Some("Linha do tempo")
        );

        drop(home);
        assert!(shell.has_root_class(DARK_MODE_CLASS));
        assert_eq!(
            shell.meta_content(META_DESCRIPTION).as_deref(),
            Some("Linha do tempo")
        );

        drop(timeline);
        assert!(!shell.has_root_class(DARK_MODE_CLASS));
    }

    #[test]
    fn light_view_touches_nothing() {
        let shell = DocumentShell::new();
        let guard = shell.enter_view(ViewConfig {
            view: "plain",
            dark_mode: false,
            meta_description: None,
        });
        assert!(!shell.has_root_class(DARK_MODE_CLASS));
        assert_eq!(shell.meta_tag_count(), 0);
        assert_eq!(guard.view(), "plain");
    }

    #[test]
    fn listener_set_deregisters_on_drop() {
        let shell = DocumentShell::new();
        let mut listeners = shell.listeners("timeline");
        listeners.register(ListenerKind::Resize);
        listeners.register(ListenerKind::KeyDown);
        assert!(listeners.is_registered(ListenerKind::Resize));
        assert!(!listeners.is_registered(ListenerKind::MediaPlay));
        assert_eq!(
            shell.active_listeners(),
            vec![
                ("timeline", ListenerKind::Resize),
                ("timeline", ListenerKind::KeyDown)
            ]
        );

        drop(listeners);
        assert!(shell.active_listeners().is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let shell = DocumentShell::new();
        let mut listeners = shell.listeners("home");
        listeners.register(ListenerKind::Resize);
        assert_eq!(listeners.clear(), 1);
        assert_eq!(listeners.clear(), 0);
        assert!(listeners.is_empty());
    }
}
