//! The enable/disable state machine.
//!
//! An [`Engine`] is either disabled (no session) or enabled (one live
//! [`EngineSession`]). All state created by `enable` lives in the session and
//! is discarded by `disable`, so toggling repeatedly on a long-lived document
//! never accumulates identifiers, watchers or stylesheets.
//!
//! ```rust
//! use dusk::{Engine, EngineConfig, MemoryDocument, Transition};
//!
//! let mut doc = MemoryDocument::html();
//! let root = doc.root_id().unwrap();
//! doc.set_background(root, "rgb(255, 255, 255)");
//!
//! let mut engine = Engine::new();
//! assert_eq!(engine.enable(&mut doc, EngineConfig::default()), Transition::Enabled);
//! assert_eq!(engine.enable(&mut doc, EngineConfig::default()), Transition::AlreadyEnabled);
//! assert!(engine.stylesheet().is_some());
//!
//! assert_eq!(engine.disable(&mut doc), Transition::Disabled);
//! assert_eq!(engine.disable(&mut doc), Transition::AlreadyDisabled);
//! ```

use std::fmt;
use std::hash::Hash;

use log::{debug, warn};

use crate::classify::detect_dark_signal;
use crate::config::{EngineConfig, ResolvedPalette, Strategy};
use crate::host::{Host, TimerId};
use crate::mode::{detect_color_mode, ColorMode};
use crate::policy::Policy;
use crate::scan::{OverrideRecord, Scanner};
use crate::stylesheet::Synthesizer;
use crate::watch::Watcher;

/// Coarse engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Disabled,
    Enabled,
}

/// What an `enable` or `disable` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to enabled; the stylesheet is installed.
    Enabled,
    /// Was already enabled; nothing changed.
    AlreadyEnabled,
    /// The document is already dark; nothing changed.
    AlreadyDark,
    /// The host has no document element yet; nothing changed.
    NoDocument,
    /// The config failed validation; nothing changed.
    Rejected,
    /// Moved to disabled; the stylesheet and watcher are gone.
    Disabled,
    /// Was already disabled; nothing changed.
    AlreadyDisabled,
}

/// All mutable state of one enable cycle.
pub struct EngineSession<N> {
    config: EngineConfig,
    palette: ResolvedPalette,
    policy: Policy,
    scanner: Scanner<N>,
    stylesheet: Synthesizer,
    watcher: Option<Watcher<N>>,
}

impl<N> fmt::Debug for EngineSession<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSession")
            .field("strategy", &self.config.strategy)
            .field("scanner", &self.scanner)
            .field("generation", &self.stylesheet.generation())
            .field("watching", &self.watcher.is_some())
            .finish()
    }
}

impl<N: Copy + Eq + Hash + fmt::Debug> EngineSession<N> {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn records(&self) -> &[OverrideRecord] {
        self.scanner.records()
    }
}

/// Adaptive recoloring engine for one document.
///
/// `N` is the host's node handle type. The engine never owns the host; every
/// operation borrows it for the duration of the call.
pub struct Engine<N> {
    session: Option<EngineSession<N>>,
}

impl<N> fmt::Debug for Engine<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").field("session", &self.session).finish()
    }
}

impl<N> Default for Engine<N> {
    fn default() -> Self {
        Self { session: None }
    }
}

impl<N: Copy + Eq + Hash + fmt::Debug> Engine<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EngineState {
        if self.session.is_some() {
            EngineState::Enabled
        } else {
            EngineState::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EngineSession<N>> {
        self.session.as_ref()
    }

    /// Override records of the live session, in assignment order.
    pub fn overrides(&self) -> &[OverrideRecord] {
        match &self.session {
            Some(session) => session.records(),
            None => &[],
        }
    }

    pub fn override_count(&self) -> usize {
        self.overrides().len()
    }

    /// The stylesheet text last written by the live session.
    pub fn stylesheet(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.stylesheet.text())
    }

    /// Darkens the document.
    ///
    /// No-op when already enabled, when the config is invalid, when the host
    /// has no root element, or when the document is already dark. Otherwise
    /// scans the whole tree, writes the stylesheet and (if configured) starts
    /// watching for insertions.
    pub fn enable<H>(&mut self, host: &mut H, config: EngineConfig) -> Transition
    where
        H: Host<Node = N>,
    {
        if self.session.is_some() {
            return Transition::AlreadyEnabled;
        }

        let palette = match config.validate() {
            Ok(palette) => palette,
            Err(err) => {
                warn!("refusing to enable: {}", err);
                return Transition::Rejected;
            }
        };

        let Some(root) = host.root() else {
            debug!("no document element; staying disabled");
            return Transition::NoDocument;
        };

        if let Some(signal) = detect_dark_signal(&*host) {
            debug!("document already dark ({:?}); staying disabled", signal);
            return Transition::AlreadyDark;
        }

        let policy = Policy::from_config(&config, &palette);
        let mut scanner = Scanner::new();
        let mut stylesheet = Synthesizer::new();
        let mut watcher = None;

        match config.strategy {
            Strategy::Adaptive => {
                scanner.scan(host, root, &policy);
                stylesheet.regenerate(host, scanner.records(), &palette);
                if config.track_mutations {
                    watcher = Some(Watcher::start(host, config.batch_window()));
                }
            }
            Strategy::Invert => stylesheet.write_inverted(host),
        }

        debug!(
            "enabled ({:?}) with {} overrides",
            config.strategy,
            scanner.records().len()
        );
        self.session = Some(EngineSession {
            config,
            palette,
            policy,
            scanner,
            stylesheet,
            watcher,
        });
        Transition::Enabled
    }

    /// Restores the document.
    ///
    /// Stops the watcher and cancels its pending timer, removes the managed
    /// stylesheet, strips assigned identifiers and discards the session.
    pub fn disable<H>(&mut self, host: &mut H) -> Transition
    where
        H: Host<Node = N>,
    {
        let Some(mut session) = self.session.take() else {
            return Transition::AlreadyDisabled;
        };

        if let Some(watcher) = session.watcher.take() {
            watcher.stop(host);
        }
        session.stylesheet.remove(host);
        session.scanner.release(host);

        debug!("disabled");
        Transition::Disabled
    }

    /// Enables for [`ColorMode::Dark`], disables for [`ColorMode::Light`].
    pub fn apply_mode<H>(
        &mut self,
        host: &mut H,
        config: EngineConfig,
        mode: ColorMode,
    ) -> Transition
    where
        H: Host<Node = N>,
    {
        match mode {
            ColorMode::Dark => self.enable(host, config),
            ColorMode::Light => self.disable(host),
        }
    }

    /// [`apply_mode`](Self::apply_mode) with the mode from
    /// [`detect_color_mode`].
    pub fn sync_with_os<H>(&mut self, host: &mut H, config: EngineConfig) -> Transition
    where
        H: Host<Node = N>,
    {
        let mode = detect_color_mode();
        debug!("following preferred color mode: {}", mode);
        self.apply_mode(host, config, mode)
    }

    /// Host callback: nodes were inserted into the observed tree.
    ///
    /// Ignored unless enabled with mutation tracking.
    pub fn nodes_inserted<H>(&mut self, host: &mut H, nodes: &[N])
    where
        H: Host<Node = N>,
    {
        if let Some(watcher) = self.session.as_mut().and_then(|s| s.watcher.as_mut()) {
            watcher.record(host, nodes.iter().copied());
        }
    }

    /// Host callback: a timer set through the host expired.
    ///
    /// Scans each node inserted since the last batch and rewrites the
    /// stylesheet if any new records appeared. Timers from a torn-down
    /// session, or not owned by the watcher, are ignored. Returns whether the
    /// stylesheet was rewritten.
    pub fn timer_fired<H>(&mut self, host: &mut H, timer: TimerId) -> bool
    where
        H: Host<Node = N>,
    {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(batch) = session.watcher.as_mut().and_then(|w| w.take_batch(timer)) else {
            return false;
        };

        let mut created = 0;
        for node in &batch {
            created += session.scanner.scan(host, *node, &session.policy).len();
        }

        debug!(
            "batch of {} inserted nodes produced {} new overrides",
            batch.len(),
            created
        );
        if created == 0 {
            return false;
        }

        session
            .stylesheet
            .regenerate(host, session.scanner.records(), &session.palette);
        true
    }
}
