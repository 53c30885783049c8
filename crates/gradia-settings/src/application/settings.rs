//! The settings handle: typed get / set / observe over a [`SettingsBackend`].
//!
//! # Threading model (for beginners)
//!
//! GUI toolkits run every event handler on one thread, the *UI thread*.
//! [`Settings`] follows the same rule: it is a cheap `Rc` handle that can be
//! cloned into every widget that needs it, but it is deliberately **not**
//! `Send`, so the compiler stops you from touching it from a worker thread.
//!
//! Work that runs elsewhere (an export job, for instance) asks for a
//! [`SettingsSender`] instead.  The sender is `Send + Clone` and only queues
//! writes; the UI thread applies them with [`Settings::apply_pending`].
//!
//! # Change notification
//!
//! Observers are called synchronously, inside the `set` call that changed the
//! value.  An observer may itself write settings.  Two rules keep that from
//! recursing forever:
//!
//! 1. Writing the value a key already has is a no-op and notifies nobody.
//! 2. Notifications nest at most [`MAX_NOTIFY_DEPTH`] levels deep; deeper
//!    writes are still applied but their notifications are dropped with a
//!    warning.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gradia_core::{
    AspectRatio, DrawMode, ExportFormat, FromSettingValue, Rgba, SchemaError, SettingKey,
    SettingValue, TypeMismatchError, ValueType,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::backend::{BackendError, MemoryBackend, SettingsBackend};

/// Maximum nesting of observer notifications triggered by observer writes.
pub const MAX_NOTIFY_DEPTH: usize = 16;

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatchError),

    /// Doubles must be finite; NaN would also defeat the equality check.
    #[error("non-finite value for key {0}")]
    NonFinite(SettingKey),

    #[error("settings backend failed: {0}")]
    Backend(#[from] BackendError),

    /// The [`Settings`] instance a [`SettingsSender`] belongs to was dropped.
    #[error("settings store is no longer available")]
    Closed,
}

/// Handle returned by [`Settings::observe`], used to disconnect the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<dyn Fn(SettingKey, &SettingValue)>;

struct Observer {
    id: SubscriptionId,
    /// `None` observes every key.
    key: Option<SettingKey>,
    callback: Callback,
}

/// A write queued from another thread.
#[derive(Debug, Clone, PartialEq)]
enum PendingWrite {
    Set(SettingKey, SettingValue),
    Reset(SettingKey),
}

struct SettingsInner {
    backend: RefCell<Box<dyn SettingsBackend>>,
    overrides: RefCell<HashMap<SettingKey, SettingValue>>,
    observers: RefCell<Vec<Observer>>,
    next_subscription: Cell<u64>,
    notify_depth: Cell<usize>,
    pending_tx: mpsc::UnboundedSender<PendingWrite>,
    pending_rx: RefCell<mpsc::UnboundedReceiver<PendingWrite>>,
}

/// Typed, observable access to the persisted settings.
///
/// Construct one per application (or one per test) and pass clones to every
/// component that needs settings.  All clones share the same state.
#[derive(Clone)]
pub struct Settings {
    inner: Rc<SettingsInner>,
}

impl Settings {
    /// Opens a settings store over `backend`, loading its stored overrides.
    ///
    /// Stored entries that do not fit the schema are dropped with a warning:
    /// unknown keys are ignored and wrong-typed values fall back to the
    /// default.  An integer stored for a double key is widened.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Backend`] if the backend cannot be read at all.
    pub fn new(backend: impl SettingsBackend + 'static) -> Result<Self, SettingsError> {
        let mut backend: Box<dyn SettingsBackend> = Box::new(backend);
        let overrides = validate_stored(backend.load()?);
        info!("loaded {} stored setting override(s)", overrides.len());
        Ok(Self::from_parts(backend, overrides))
    }

    /// Opens an isolated store with every key at its default.
    pub fn in_memory() -> Self {
        Self::from_parts(Box::new(MemoryBackend::new()), HashMap::new())
    }

    fn from_parts(
        backend: Box<dyn SettingsBackend>,
        overrides: HashMap<SettingKey, SettingValue>,
    ) -> Self {
        let (pending_tx, pending_rx) = mpsc::unbounded_channel();
        Self {
            inner: Rc::new(SettingsInner {
                backend: RefCell::new(backend),
                overrides: RefCell::new(overrides),
                observers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                notify_depth: Cell::new(0),
                pending_tx,
                pending_rx: RefCell::new(pending_rx),
            }),
        }
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    /// Returns the stored value of `key`, or its schema default.
    pub fn get(&self, key: SettingKey) -> SettingValue {
        self.inner
            .overrides
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    /// Returns the value of `key` as a Rust type.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError`] if `T` does not match the key's declared
    /// type.
    pub fn get_as<T: FromSettingValue>(&self, key: SettingKey) -> Result<T, TypeMismatchError> {
        let value = self.get(key);
        T::extract(&value).ok_or_else(|| TypeMismatchError {
            key: key.name().to_string(),
            expected: key.value_type(),
            actual: T::VALUE_TYPE,
        })
    }

    /// Looks a key up by name and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownKey`] for names absent from the schema.
    pub fn get_by_name(&self, name: &str) -> Result<SettingValue, SchemaError> {
        Ok(self.get(name.parse()?))
    }

    /// `true` if `key` has a stored value (even one equal to its default).
    pub fn is_overridden(&self, key: SettingKey) -> bool {
        self.inner.overrides.borrow().contains_key(&key)
    }

    /// Every key with its effective value, in schema order.
    pub fn snapshot(&self) -> Vec<(SettingKey, SettingValue)> {
        SettingKey::ALL
            .iter()
            .map(|&key| (key, self.get(key)))
            .collect()
    }

    // ── Writes ────────────────────────────────────────────────────────────────

    /// Writes `value` under `key`, persists it and notifies observers.
    ///
    /// Writing the current value does nothing.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::TypeMismatch`] if `value` has the wrong type.
    /// - [`SettingsError::NonFinite`] for NaN or infinite doubles.
    /// - [`SettingsError::Backend`] if persisting fails.
    ///
    /// On every error the prior value is kept.
    pub fn set(&self, key: SettingKey, value: impl Into<SettingValue>) -> Result<(), SettingsError> {
        let value = value.into();
        check_type(key, &value)?;

        if self.get(key) == value {
            debug!(%key, "value unchanged, skipping write");
            return Ok(());
        }

        if let Err(e) = self.inner.backend.borrow_mut().write(key, &value) {
            warn!(%key, "failed to persist setting: {e}");
            return Err(e.into());
        }
        self.inner.overrides.borrow_mut().insert(key, value.clone());
        debug!(%key, %value, "setting changed");

        self.notify(key, &value);
        Ok(())
    }

    /// Looks a key up by name and writes `value`.
    ///
    /// # Errors
    ///
    /// As [`Settings::set`], plus [`SchemaError::UnknownKey`].
    pub fn set_by_name(&self, name: &str, value: impl Into<SettingValue>) -> Result<(), SettingsError> {
        let key: SettingKey = name.parse()?;
        self.set(key, value)
    }

    /// Parses `text` according to the key's declared type and writes it.
    ///
    /// Keys backed by a codec (colours, draw mode, export format, aspect
    /// ratio) are validated and stored in canonical form, so a typo on the
    /// command line cannot land a corrupted value in the store.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownKey`], [`SchemaError::InvalidLiteral`], or any
    /// error of [`Settings::set`].
    pub fn set_from_literal(&self, name: &str, text: &str) -> Result<(), SettingsError> {
        let key: SettingKey = name.parse()?;
        let value = SettingValue::parse_literal(key.name(), key.value_type(), text)?;
        let value = canonicalize(key, value)?;
        self.set(key, value)
    }

    /// Restores the schema default of `key` and removes the stored override.
    ///
    /// Observers are notified only if the effective value changes.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Backend`] if the override cannot be removed;
    /// the override is then kept.
    pub fn reset(&self, key: SettingKey) -> Result<(), SettingsError> {
        let previous = match self.inner.overrides.borrow().get(&key) {
            Some(v) => v.clone(),
            None => return Ok(()),
        };

        if let Err(e) = self.inner.backend.borrow_mut().remove(key) {
            warn!(%key, "failed to reset setting: {e}");
            return Err(e.into());
        }
        self.inner.overrides.borrow_mut().remove(&key);
        debug!(%key, "setting reset to default");

        let default = key.default_value();
        if previous != default {
            self.notify(key, &default);
        }
        Ok(())
    }

    /// Resets every key.
    ///
    /// # Errors
    ///
    /// Stops at the first key whose override cannot be removed.
    pub fn reset_all(&self) -> Result<(), SettingsError> {
        for key in SettingKey::ALL {
            self.reset(key)?;
        }
        Ok(())
    }

    // ── Observers ─────────────────────────────────────────────────────────────

    /// Registers `callback` to run whenever the value of `key` changes.
    pub fn observe<F>(&self, key: SettingKey, callback: F) -> SubscriptionId
    where
        F: Fn(&SettingValue) + 'static,
    {
        self.register(Some(key), Rc::new(move |_: SettingKey, value: &SettingValue| callback(value)))
    }

    /// Registers `callback` to run whenever any key changes.
    pub fn observe_all<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SettingKey, &SettingValue) + 'static,
    {
        self.register(None, Rc::new(callback))
    }

    /// Removes an observer.  Returns `false` if it was already gone.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut observers = self.inner.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        observers.len() != before
    }

    fn register(&self, key: Option<SettingKey>, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner.observers.borrow_mut().push(Observer { id, key, callback });
        id
    }

    fn notify(&self, key: SettingKey, value: &SettingValue) {
        let depth = self.inner.notify_depth.get();
        if depth >= MAX_NOTIFY_DEPTH {
            warn!(%key, depth, "observer writes nested too deeply; dropping notification");
            return;
        }

        // Snapshot the matching callbacks so observers may (dis)connect or
        // write settings while being notified.
        let callbacks: Vec<Callback> = self
            .inner
            .observers
            .borrow()
            .iter()
            .filter(|o| o.key.map_or(true, |k| k == key))
            .map(|o| Rc::clone(&o.callback))
            .collect();

        let _depth = DepthGuard::enter(&self.inner.notify_depth);
        for callback in callbacks {
            callback(key, value);
        }
    }

    // ── Writes from other threads ─────────────────────────────────────────────

    /// Returns a thread-safe handle for queueing writes.
    pub fn sender(&self) -> SettingsSender {
        SettingsSender {
            tx: self.inner.pending_tx.clone(),
        }
    }

    /// Applies every queued write, in order.  Returns how many were applied.
    ///
    /// Call this from the UI thread, e.g. from an idle handler.  Queued writes
    /// that fail validation are logged and dropped.
    pub fn apply_pending(&self) -> usize {
        let mut applied = 0;
        loop {
            // Release the receiver before applying, observers may queue more.
            let next = self.inner.pending_rx.borrow_mut().try_recv();
            let Ok(write) = next else { break };

            let result = match write {
                PendingWrite::Set(key, value) => self.set(key, value),
                PendingWrite::Reset(key) => self.reset(key),
            };
            match result {
                Ok(()) => applied += 1,
                Err(e) => warn!("dropping queued settings write: {e}"),
            }
        }
        applied
    }
}

/// Holds one level of notification nesting; restores the depth on drop, so a
/// panicking observer cannot leave the counter raised.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

/// Queues settings writes from any thread for [`Settings::apply_pending`].
#[derive(Debug, Clone)]
pub struct SettingsSender {
    tx: mpsc::UnboundedSender<PendingWrite>,
}

impl SettingsSender {
    /// Queues a write.  Type errors are caught immediately; everything else is
    /// checked when the write is applied.
    ///
    /// # Errors
    ///
    /// [`SettingsError::TypeMismatch`] / [`SettingsError::NonFinite`] for
    /// invalid values, [`SettingsError::Closed`] if the store was dropped.
    pub fn set(&self, key: SettingKey, value: impl Into<SettingValue>) -> Result<(), SettingsError> {
        let value = value.into();
        check_type(key, &value)?;
        self.tx
            .send(PendingWrite::Set(key, value))
            .map_err(|_| SettingsError::Closed)
    }

    /// Queues a reset of `key`.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Closed`] if the store was dropped.
    pub fn reset(&self, key: SettingKey) -> Result<(), SettingsError> {
        self.tx
            .send(PendingWrite::Reset(key))
            .map_err(|_| SettingsError::Closed)
    }
}

// ── Validation helpers ────────────────────────────────────────────────────────

fn check_type(key: SettingKey, value: &SettingValue) -> Result<(), SettingsError> {
    let actual = value.value_type();
    if actual != key.value_type() {
        return Err(TypeMismatchError {
            key: key.name().to_string(),
            expected: key.value_type(),
            actual,
        }
        .into());
    }
    if let SettingValue::Double(d) = value {
        if !d.is_finite() {
            return Err(SettingsError::NonFinite(key));
        }
    }
    Ok(())
}

/// Validates codec-backed string keys and rewrites them in canonical form.
fn canonicalize(key: SettingKey, value: SettingValue) -> Result<SettingValue, SchemaError> {
    let text = match value {
        SettingValue::String(text) => text,
        other => return Ok(other),
    };
    let canonical = match key {
        SettingKey::PenColor | SettingKey::HighlighterColor | SettingKey::FillColor => {
            text.parse::<Rgba>().ok().map(|c| c.encode())
        }
        SettingKey::DrawMode => text.parse::<DrawMode>().ok().map(|m| m.to_string()),
        SettingKey::ExportFormat => text.parse::<ExportFormat>().ok().map(|f| f.to_string()),
        SettingKey::ImageAspectRatio => text.parse::<AspectRatio>().ok().map(|r| r.to_string()),
        _ => return Ok(SettingValue::String(text)),
    };
    canonical
        .map(SettingValue::String)
        .ok_or(SchemaError::InvalidLiteral {
            key: key.name().to_string(),
            expected: ValueType::String,
            literal: text,
        })
}

/// Turns raw backend entries into schema-valid overrides.
fn validate_stored(entries: Vec<(String, SettingValue)>) -> HashMap<SettingKey, SettingValue> {
    let mut overrides = HashMap::new();
    for (name, value) in entries {
        let key: SettingKey = match name.parse() {
            Ok(key) => key,
            Err(e) => {
                warn!("ignoring stored setting: {e}");
                continue;
            }
        };
        let value = match (key.value_type(), value) {
            (ValueType::Double, SettingValue::Integer(i)) => SettingValue::Double(f64::from(i)),
            (_, value) => value,
        };
        if let Err(e) = check_type(key, &value) {
            warn!(%key, "discarding stored value, using default: {e}");
            continue;
        }
        overrides.insert(key, value);
    }
    overrides
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::application::backend::MockSettingsBackend;

    fn recorder(settings: &Settings, key: SettingKey) -> Rc<RefCell<Vec<SettingValue>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        settings.observe(key, move |v| sink.borrow_mut().push(v.clone()));
        seen
    }

    // ── Defaults and round trips ──────────────────────────────────────────────

    #[test]
    fn test_fresh_store_returns_defaults_for_every_key() {
        let settings = Settings::in_memory();
        for key in SettingKey::ALL {
            assert_eq!(settings.get(key), key.default_value(), "{key}");
            assert!(!settings.is_overridden(key));
        }
    }

    #[test]
    fn test_set_then_get_round_trips() {
        // Arrange
        let settings = Settings::in_memory();

        // Act
        settings.set(SettingKey::PenSize, 7.25).unwrap();
        settings.set(SettingKey::ImagePadding, -3).unwrap();
        settings.set(SettingKey::ExportCompress, false).unwrap();
        settings.set(SettingKey::Font, "Cantarell").unwrap();

        // Assert
        assert_eq!(settings.get(SettingKey::PenSize), SettingValue::Double(7.25));
        assert_eq!(settings.get(SettingKey::ImagePadding), SettingValue::Integer(-3));
        assert_eq!(settings.get(SettingKey::ExportCompress), SettingValue::Boolean(false));
        assert_eq!(settings.get(SettingKey::Font), SettingValue::from("Cantarell"));
    }

    #[test]
    fn test_get_as_checks_the_requested_type() {
        let settings = Settings::in_memory();
        assert_eq!(settings.get_as::<f64>(SettingKey::PenSize), Ok(3.0));
        let err = settings.get_as::<i32>(SettingKey::PenSize).unwrap_err();
        assert_eq!(err.expected, ValueType::Double);
        assert_eq!(err.actual, ValueType::Integer);
    }

    #[test]
    fn test_get_by_name_rejects_unknown_key() {
        let settings = Settings::in_memory();
        assert_eq!(
            settings.get_by_name("pen-colour"),
            Err(SchemaError::UnknownKey("pen-colour".to_string()))
        );
        assert_eq!(settings.get_by_name("font"), Ok(SettingValue::from("Adwaita Sans")));
    }

    // ── Type validation ───────────────────────────────────────────────────────

    #[test]
    fn test_set_with_wrong_type_keeps_prior_value() {
        // Arrange
        let settings = Settings::in_memory();
        settings.set(SettingKey::PenSize, 4.0).unwrap();

        // Act
        let result = settings.set(SettingKey::PenSize, "big");

        // Assert
        assert!(matches!(result, Err(SettingsError::TypeMismatch(_))));
        assert_eq!(settings.get(SettingKey::PenSize), SettingValue::Double(4.0));
    }

    #[test]
    fn test_set_rejects_integer_for_double_key() {
        let settings = Settings::in_memory();
        let result = settings.set(SettingKey::PenSize, 4);
        assert!(matches!(result, Err(SettingsError::TypeMismatch(_))));
    }

    #[test]
    fn test_set_rejects_nan() {
        let settings = Settings::in_memory();
        let result = settings.set(SettingKey::NumberRadius, f64::NAN);
        assert!(matches!(result, Err(SettingsError::NonFinite(SettingKey::NumberRadius))));
        assert_eq!(settings.get(SettingKey::NumberRadius), SettingValue::Double(10.0));
    }

    #[test]
    fn test_set_by_name_reports_unknown_key() {
        let settings = Settings::in_memory();
        let result = settings.set_by_name("no-such-key", true);
        assert!(matches!(result, Err(SettingsError::Schema(SchemaError::UnknownKey(_)))));
    }

    #[test]
    fn test_set_from_literal_canonicalizes_codec_keys() {
        let settings = Settings::in_memory();

        settings.set_from_literal("pen-color", "1, 0.5, 0, 1").unwrap();
        settings.set_from_literal("export-format", "JPEG").unwrap();
        settings.set_from_literal("image-aspect-ratio", " 16 : 9 ").unwrap();
        settings.set_from_literal("pen-size", "2.5").unwrap();

        assert_eq!(settings.get(SettingKey::PenColor), SettingValue::from("1.000,0.500,0.000,1.000"));
        assert_eq!(settings.get(SettingKey::ExportFormat), SettingValue::from("jpg"));
        assert_eq!(settings.get(SettingKey::ImageAspectRatio), SettingValue::from("16:9"));
        assert_eq!(settings.get(SettingKey::PenSize), SettingValue::Double(2.5));
    }

    #[test]
    fn test_set_from_literal_rejects_malformed_codec_values() {
        let settings = Settings::in_memory();
        assert!(settings.set_from_literal("draw-mode", "LASER").is_err());
        assert!(settings.set_from_literal("fill-color", "red").is_err());
        assert!(settings.set_from_literal("image-padding", "lots").is_err());
        assert_eq!(settings.get(SettingKey::DrawMode), SettingValue::from("SELECT"));
    }

    // ── Observers ─────────────────────────────────────────────────────────────

    #[test]
    fn test_observer_notified_once_and_not_for_equal_value() {
        // Arrange
        let settings = Settings::in_memory();
        let seen = recorder(&settings, SettingKey::PenColor);
        let x = SettingValue::from("0.000,0.000,1.000,1.000");

        // Act
        settings.set(SettingKey::PenColor, x.clone()).unwrap();
        settings.set(SettingKey::PenColor, x.clone()).unwrap();

        // Assert
        assert_eq!(*seen.borrow(), vec![x]);
    }

    #[test]
    fn test_observer_not_notified_for_other_keys() {
        let settings = Settings::in_memory();
        let seen = recorder(&settings, SettingKey::PenColor);
        settings.set(SettingKey::PenSize, 9.0).unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_observe_all_receives_key_and_value() {
        let settings = Settings::in_memory();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        settings.observe_all(move |k, v| sink.borrow_mut().push((k, v.clone())));

        settings.set(SettingKey::ImageAutoBalance, true).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![(SettingKey::ImageAutoBalance, SettingValue::Boolean(true))]
        );
    }

    #[test]
    fn test_disconnect_stops_notifications() {
        let settings = Settings::in_memory();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let id = settings.observe(SettingKey::Font, move |_| c.set(c.get() + 1));

        settings.set(SettingKey::Font, "A").unwrap();
        assert!(settings.disconnect(id));
        settings.set(SettingKey::Font, "B").unwrap();

        assert_eq!(count.get(), 1);
        assert!(!settings.disconnect(id));
    }

    #[test]
    fn test_observer_may_write_another_key() {
        // Arrange: mirror highlighter size from pen size
        let settings = Settings::in_memory();
        let handle = settings.clone();
        settings.observe(SettingKey::PenSize, move |v| {
            handle.set(SettingKey::HighlighterSize, v.clone()).unwrap();
        });

        // Act
        settings.set(SettingKey::PenSize, 6.0).unwrap();

        // Assert
        assert_eq!(settings.get(SettingKey::HighlighterSize), SettingValue::Double(6.0));
    }

    #[test]
    fn test_ping_pong_observers_terminate() {
        // Arrange: each observer flips the other key, which would recurse forever
        let settings = Settings::in_memory();
        let a = settings.clone();
        settings.observe(SettingKey::ExportCompress, move |v| {
            let flipped = !v.as_bool().unwrap();
            a.set(SettingKey::ImageAutoBalance, flipped).unwrap();
        });
        let b = settings.clone();
        settings.observe(SettingKey::ImageAutoBalance, move |v| {
            let flipped = v.as_bool().unwrap();
            b.set(SettingKey::ExportCompress, flipped).unwrap();
        });

        // Act: returns instead of overflowing the stack
        settings.set(SettingKey::ExportCompress, false).unwrap();

        // Assert: the depth counter unwound
        assert_eq!(settings.inner.notify_depth.get(), 0);
    }

    // ── Reset ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_reset_restores_default_and_notifies() {
        let settings = Settings::in_memory();
        settings.set(SettingKey::ImagePadding, 40).unwrap();
        let seen = recorder(&settings, SettingKey::ImagePadding);

        settings.reset(SettingKey::ImagePadding).unwrap();

        assert_eq!(settings.get(SettingKey::ImagePadding), SettingValue::Integer(5));
        assert!(!settings.is_overridden(SettingKey::ImagePadding));
        assert_eq!(*seen.borrow(), vec![SettingValue::Integer(5)]);
    }

    #[test]
    fn test_reset_of_override_equal_to_default_is_silent() {
        let settings = Settings::in_memory();
        settings.set(SettingKey::ImagePadding, 6).unwrap();
        settings.set(SettingKey::ImagePadding, 5).unwrap();
        let seen = recorder(&settings, SettingKey::ImagePadding);

        settings.reset(SettingKey::ImagePadding).unwrap();

        assert!(seen.borrow().is_empty());
        assert!(!settings.is_overridden(SettingKey::ImagePadding));
    }

    #[test]
    fn test_reset_all_clears_every_override() {
        let settings = Settings::in_memory();
        settings.set(SettingKey::Font, "Cantarell").unwrap();
        settings.set(SettingKey::ExportCompress, false).unwrap();

        settings.reset_all().unwrap();

        assert!(SettingKey::ALL.iter().all(|&k| !settings.is_overridden(k)));
    }

    // ── Backend interaction ───────────────────────────────────────────────────

    #[test]
    fn test_backend_failure_keeps_prior_value_and_skips_observers() {
        // Arrange
        let mut backend = MockSettingsBackend::new();
        backend.expect_load().returning(|| Ok(Vec::new()));
        backend.expect_write().returning(|_, _| {
            Err(BackendError::Serialize("disk full".to_string()))
        });
        let settings = Settings::new(backend).unwrap();
        let seen = recorder(&settings, SettingKey::Font);

        // Act
        let result = settings.set(SettingKey::Font, "Cantarell");

        // Assert
        assert!(matches!(result, Err(SettingsError::Backend(_))));
        assert_eq!(settings.get(SettingKey::Font), SettingValue::from("Adwaita Sans"));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unchanged_value_is_not_persisted() {
        let mut backend = MockSettingsBackend::new();
        backend.expect_load().returning(|| Ok(Vec::new()));
        backend.expect_write().times(0);
        let settings = Settings::new(backend).unwrap();

        settings.set(SettingKey::Font, "Adwaita Sans").unwrap();
    }

    #[test]
    fn test_load_failure_is_reported() {
        let mut backend = MockSettingsBackend::new();
        backend.expect_load().returning(|| {
            Err(BackendError::Parse {
                path: "settings.toml".into(),
                message: "bad".to_string(),
            })
        });
        assert!(matches!(Settings::new(backend), Err(SettingsError::Backend(_))));
    }

    #[test]
    fn test_load_drops_unknown_and_mistyped_entries() {
        // Arrange
        let backend = MemoryBackend::with_entries([
            ("no-such-key", SettingValue::Boolean(true)),
            ("pen-size", SettingValue::from("thick")),
            ("number-radius", SettingValue::Integer(12)),
            ("image-padding", SettingValue::Integer(20)),
            ("highlighter-size", SettingValue::Double(f64::INFINITY)),
        ]);

        // Act
        let settings = Settings::new(backend).unwrap();

        // Assert
        assert_eq!(settings.get(SettingKey::PenSize), SettingValue::Double(3.0));
        assert_eq!(settings.get(SettingKey::NumberRadius), SettingValue::Double(12.0));
        assert_eq!(settings.get(SettingKey::ImagePadding), SettingValue::Integer(20));
        assert_eq!(settings.get(SettingKey::HighlighterSize), SettingValue::Double(5.0));
    }

    // ── Queued writes ─────────────────────────────────────────────────────────

    #[test]
    fn test_queued_writes_apply_in_order() {
        let settings = Settings::in_memory();
        let sender = settings.sender();

        sender.set(SettingKey::Font, "A").unwrap();
        sender.set(SettingKey::Font, "B").unwrap();
        sender.reset(SettingKey::ImagePadding).unwrap();

        // Nothing changes until the UI thread drains the queue.
        assert_eq!(settings.get(SettingKey::Font), SettingValue::from("Adwaita Sans"));
        assert_eq!(settings.apply_pending(), 3);
        assert_eq!(settings.get(SettingKey::Font), SettingValue::from("B"));
        assert_eq!(settings.apply_pending(), 0);
    }

    #[test]
    fn test_sender_rejects_wrong_type_immediately() {
        let settings = Settings::in_memory();
        let result = settings.sender().set(SettingKey::ExportCompress, "yes");
        assert!(matches!(result, Err(SettingsError::TypeMismatch(_))));
        assert_eq!(settings.apply_pending(), 0);
    }

    #[test]
    fn test_sender_reports_closed_store() {
        let sender = Settings::in_memory().sender();
        assert!(matches!(
            sender.set(SettingKey::Font, "A"),
            Err(SettingsError::Closed)
        ));
    }

    #[test]
    fn test_panicking_observer_does_not_leak_notify_depth() {
        // Arrange
        let settings = Settings::in_memory();
        settings.observe(SettingKey::Font, |_| panic!("observer failed"));
        let counter = Rc::new(Cell::new(0));
        let seen = Rc::clone(&counter);
        settings.observe(SettingKey::PenSize, move |_| seen.set(seen.get() + 1));

        // Act
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            settings.set(SettingKey::Font, "Cantarell")
        }));
        settings.set(SettingKey::PenSize, 4.0).unwrap();

        // Assert
        assert!(caught.is_err());
        assert_eq!(settings.inner.notify_depth.get(), 0);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_new_and_in_memory_start_equivalent() {
        let loaded = Settings::new(MemoryBackend::new()).unwrap();
        let fresh = Settings::in_memory();

        assert_eq!(loaded.snapshot(), fresh.snapshot());
        assert_eq!(loaded.apply_pending(), 0);
        assert_eq!(fresh.apply_pending(), 0);
    }
}
