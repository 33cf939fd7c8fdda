//! The persistence context
//!
//! `StoreContext` is the handle application code holds for one unit of
//! work. It composes a `BaseContext` and adds nothing of its own: both
//! construction paths resolve options and open the base, and the
//! model-building hook is a single unmodified forward. Any mapping the
//! store ends up with came from the builder the caller supplied.

use crate::base::BaseContext;
use crate::config::{ContextOptions, GenericOptions, StoreOptions};
use crate::model::ModelBuilder;
use granary_core::errors::Result;
use rusqlite::Connection;

/// Per-unit-of-work persistence context
///
/// Single-owner: one context per unit of work, never shared across
/// concurrent operations. Dropping the context disposes the connection;
/// `close` does the same but surfaces close-time failures.
#[derive(Debug)]
pub struct StoreContext {
    base: BaseContext,
}

impl StoreContext {
    /// Construct from strongly-typed options
    pub fn new(options: StoreOptions) -> Result<Self> {
        let base = BaseContext::open(options)?;
        Ok(Self { base })
    }

    /// Construct from a generic settings document
    ///
    /// For tooling and factories that cannot name `StoreOptions`; the
    /// document is validated and resolved, then construction proceeds
    /// exactly as the typed path does.
    pub fn from_generic(options: GenericOptions) -> Result<Self> {
        Self::new(options.resolve()?)
    }

    /// Construct from either options flavor
    pub fn from_options(options: ContextOptions) -> Result<Self> {
        Self::new(options.into_store_options()?)
    }

    /// Model-initialization hook
    ///
    /// Forwards to the base behavior unmodified. This context registers no
    /// mappings of its own.
    pub fn on_model_building(&mut self, builder: &ModelBuilder) -> Result<()> {
        self.base.on_model_building(builder)
    }

    /// The options this context was constructed with
    pub fn options(&self) -> &StoreOptions {
        self.base.options()
    }

    pub fn connection(&self) -> &Connection {
        self.base.connection()
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        self.base.connection_mut()
    }

    /// End the unit of work, surfacing any close-time failure
    pub fn close(self) -> Result<()> {
        self.base.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_from_typed_options() {
        let ctx = StoreContext::new(StoreOptions::in_memory());
        assert!(ctx.is_ok());
    }

    #[test]
    fn test_construct_from_generic_options() {
        let generic = GenericOptions::new().set("in_memory", true);
        let ctx = StoreContext::from_generic(generic);
        assert!(ctx.is_ok());
    }

    #[test]
    fn test_hook_forwards_without_extra_registrations() {
        let mut ctx = StoreContext::new(StoreOptions::in_memory()).unwrap();
        ctx.on_model_building(&ModelBuilder::new()).unwrap();

        // Empty builder: nothing applied beyond the registry bookkeeping table
        let tables: Vec<String> = {
            let mut stmt = ctx
                .connection()
                .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .collect::<std::result::Result<Vec<String>, _>>()
                .unwrap()
        };
        assert_eq!(tables, ["model_registry"]);
    }
}
