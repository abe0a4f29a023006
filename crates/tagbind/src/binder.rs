//! The configured binding engine and its default-configured shortcuts.

use tagbind_store::AttributeStore;
use tagbind_types::Value;
use tracing::debug;

use crate::config::BindConfig;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::BindResult;
use crate::node::Bind;

/// Decodes records from and encodes records to attribute stores.
///
/// A `Binder` holds no state beyond its configuration; every call works on
/// the tree and the store it is handed.
#[derive(Clone, Debug, Default)]
pub struct Binder {
    config: BindConfig,
}

impl Binder {
    pub fn new(config: BindConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Populate `target` in place from `store`.
    ///
    /// On error `target` may be partially populated and must be treated as
    /// incomplete.
    pub fn decode_into<S, T>(&self, store: &S, target: &mut T) -> BindResult<()>
    where
        S: AttributeStore + ?Sized,
        T: Bind,
    {
        debug!(record = target.type_name(), "decode started");
        Decoder::new(store, &self.config).decode_root(target)?;
        debug!(record = target.type_name(), "decode finished");
        Ok(())
    }

    /// Build a fresh `T` from `store`. Nothing is returned unless the whole
    /// tree decoded.
    pub fn decode<S, T>(&self, store: &S) -> BindResult<T>
    where
        S: AttributeStore + ?Sized,
        T: Bind + Default,
    {
        let mut target = T::default();
        self.decode_into(store, &mut target)?;
        Ok(target)
    }

    /// Write the computed top-level fields of `source` to `store`.
    ///
    /// Returns the number of writes performed, identity included. The first
    /// failed write aborts the call; earlier writes are not rolled back.
    pub fn encode<S, T>(&self, store: &mut S, source: &T) -> BindResult<usize>
    where
        S: AttributeStore + ?Sized,
        T: Bind,
    {
        debug!(record = source.type_name(), "encode started");
        let writes = Encoder::new(&self.config).encode_root(store, source)?;
        debug!(record = source.type_name(), writes, "encode finished");
        Ok(writes)
    }

    /// Dynamic form of `source` as it would appear nested inside a computed
    /// field. Touches no store.
    pub fn encode_value<T>(&self, source: &T) -> BindResult<Option<Value>>
    where
        T: Bind,
    {
        Encoder::new(&self.config).encode_node(source, "", false, 0)
    }
}

/// [`Binder::decode_into`] with the default configuration.
pub fn decode_into<S, T>(store: &S, target: &mut T) -> BindResult<()>
where
    S: AttributeStore + ?Sized,
    T: Bind,
{
    Binder::default().decode_into(store, target)
}

/// [`Binder::decode`] with the default configuration.
pub fn decode<S, T>(store: &S) -> BindResult<T>
where
    S: AttributeStore + ?Sized,
    T: Bind + Default,
{
    Binder::default().decode(store)
}

/// [`Binder::encode`] with the default configuration.
pub fn encode<S, T>(store: &mut S, source: &T) -> BindResult<usize>
where
    S: AttributeStore + ?Sized,
    T: Bind,
{
    Binder::default().encode(store, source)
}

/// [`Binder::encode_value`] with the default configuration.
pub fn encode_value<T>(source: &T) -> BindResult<Option<Value>>
where
    T: Bind,
{
    Binder::default().encode_value(source)
}
