//! Generator Catalog
//!
//! Ordered set of generator definitions backed by the configuration document.
//! Readers take an `Arc<CatalogState>` snapshot under a short shared lock and then
//! work lock-free; reload and every mutation build a new state under the exclusive
//! lock, persist it, and only then publish it. A failed load or save leaves the
//! published state untouched.

use crate::document::Document;
use crate::error::OregenError;
use crate::generator::codec;
use crate::generator::GeneratorDefinition;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable view of the catalog at one point in time
#[derive(Debug, Clone)]
pub struct CatalogState {
    generators: Vec<Arc<GeneratorDefinition>>,
    default_generator: Arc<GeneratorDefinition>,
    disabled_worlds: Vec<String>,
    debug: bool,
}

impl CatalogState {
    /// Build a state holding exactly one default generator.
    ///
    /// The first generator flagged default wins and any later flags are cleared. With no
    /// flagged generator a `default` generator is synthesized and appended.
    pub fn new(
        generators: Vec<Arc<GeneratorDefinition>>,
        disabled_worlds: Vec<String>,
        debug: bool,
    ) -> Self {
        let mut default_generator: Option<Arc<GeneratorDefinition>> = None;
        let mut normalized = Vec::with_capacity(generators.len() + 1);

        for generator in generators {
            if !generator.is_default {
                normalized.push(generator);
            } else if default_generator.is_none() {
                default_generator = Some(generator.clone());
                normalized.push(generator);
            } else {
                warn!(
                    generator = %generator.name,
                    "Multiple default generators configured, keeping the first"
                );
                let mut demoted = (*generator).clone();
                demoted.is_default = false;
                normalized.push(Arc::new(demoted));
            }
        }

        let default_generator = match default_generator {
            Some(generator) => generator,
            None => {
                let synthesized = Arc::new(GeneratorDefinition::synthesized_default());
                normalized.push(synthesized.clone());
                synthesized
            }
        };

        Self {
            generators: normalized,
            default_generator,
            disabled_worlds,
            debug,
        }
    }

    fn from_document(doc: &Document) -> Result<Self, OregenError> {
        let generators = codec::read_generators(doc)
            .map_err(OregenError::ConfigLoad)?
            .into_iter()
            .map(Arc::new)
            .collect();
        Ok(Self::new(
            generators,
            codec::read_disabled_worlds(doc),
            codec::read_debug(doc),
        ))
    }

    pub fn generators(&self) -> &[Arc<GeneratorDefinition>] {
        &self.generators
    }

    pub fn default_generator(&self) -> &Arc<GeneratorDefinition> {
        &self.default_generator
    }

    pub fn disabled_worlds(&self) -> &[String] {
        &self.disabled_worlds
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// `None` maps to the default generator; an unknown name maps to `None`
    pub fn find_by_name(&self, name: Option<&str>) -> Option<Arc<GeneratorDefinition>> {
        match name {
            None => Some(self.default_generator.clone()),
            Some(name) => self.generators.iter().find(|g| g.name == name).cloned(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.generators.iter().position(|g| g.name == name)
    }
}

struct CatalogInner {
    document: Document,
    state: Arc<CatalogState>,
}

/// Catalog of generator definitions
pub struct GeneratorCatalog {
    inner: RwLock<CatalogInner>,
}

impl GeneratorCatalog {
    /// Load the catalog from `document`'s backing file
    pub fn load(document: Document) -> Result<Self, OregenError> {
        let catalog = Self {
            inner: RwLock::new(CatalogInner {
                state: Arc::new(CatalogState::new(Vec::new(), Vec::new(), false)),
                document,
            }),
        };
        catalog.reload()?;
        Ok(catalog)
    }

    /// Re-read generators, disabled worlds and the debug flag from disk.
    ///
    /// A synthesized default is kept in memory only until the next explicit write.
    pub fn reload(&self) -> Result<(), OregenError> {
        let mut inner = self.inner.write();
        let mut document = inner.document.clone();
        document.load().map_err(OregenError::ConfigLoad)?;
        let state = CatalogState::from_document(&document)?;

        info!(
            path = %document.path().display(),
            generators = state.generators.len(),
            default = %state.default_generator.name,
            "Generator catalog loaded"
        );
        inner.document = document;
        inner.state = Arc::new(state);
        Ok(())
    }

    /// Current published state
    pub fn snapshot(&self) -> Arc<CatalogState> {
        self.inner.read().state.clone()
    }

    pub fn all(&self) -> Vec<Arc<GeneratorDefinition>> {
        self.snapshot().generators.clone()
    }

    pub fn default_generator(&self) -> Arc<GeneratorDefinition> {
        self.snapshot().default_generator.clone()
    }

    pub fn disabled_worlds(&self) -> Vec<String> {
        self.snapshot().disabled_worlds.clone()
    }

    pub fn is_world_disabled(&self, world: &str) -> bool {
        self.snapshot().disabled_worlds.iter().any(|w| w == world)
    }

    pub fn is_debug(&self) -> bool {
        self.snapshot().debug
    }

    pub fn find_by_name(&self, name: Option<&str>) -> Option<Arc<GeneratorDefinition>> {
        self.snapshot().find_by_name(name)
    }

    pub fn len(&self) -> usize {
        self.snapshot().generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a generator. Returns `false` without mutation when the name is taken.
    ///
    /// Only one generator can be default, so a definition flagged default is rejected.
    pub fn add(&self, definition: GeneratorDefinition) -> Result<bool, OregenError> {
        validate(&definition)?;
        let mut inner = self.inner.write();
        if inner.state.position(&definition.name).is_some() {
            debug!(generator = %definition.name, "Generator already exists");
            return Ok(false);
        }

        if definition.is_default {
            return Err(second_default(&inner.state, definition.name));
        }

        let name = definition.name.clone();
        let mut generators = inner.state.generators.clone();
        generators.push(Arc::new(definition));
        Self::commit(&mut inner, generators)?;
        debug!(generator = %name, "Generator added");
        Ok(true)
    }

    /// Remove the first generator named `name`. Returns whether one was removed.
    pub fn remove(&self, name: &str) -> Result<bool, OregenError> {
        let mut inner = self.inner.write();
        let Some(index) = inner.state.position(name) else {
            return Ok(false);
        };

        let mut generators = inner.state.generators.clone();
        generators.remove(index);
        Self::commit(&mut inner, generators)?;
        debug!(generator = %name, "Generator removed");
        Ok(true)
    }

    /// Replace the generator named `name` in place. The replacement may carry a new name,
    /// but not one already used by a different generator. Only the current default may
    /// keep the default flag.
    pub fn update(&self, name: &str, definition: GeneratorDefinition) -> Result<bool, OregenError> {
        validate(&definition)?;
        let mut inner = self.inner.write();
        let Some(index) = inner.state.position(name) else {
            return Ok(false);
        };
        if definition.name != name && inner.state.position(&definition.name).is_some() {
            return Err(OregenError::InvalidGenerator {
                name: definition.name,
                reason: "name already used by another generator".to_string(),
            });
        }

        if definition.is_default && !inner.state.generators[index].is_default {
            return Err(second_default(&inner.state, definition.name));
        }

        let renamed = definition.name.clone();
        let mut generators = inner.state.generators.clone();
        generators[index] = Arc::new(definition);
        Self::commit(&mut inner, generators)?;
        debug!(generator = %name, new_name = %renamed, "Generator updated");
        Ok(true)
    }

    /// Replace the disabled world list and save
    pub fn set_disabled_worlds(&self, worlds: Vec<String>) -> Result<(), OregenError> {
        let mut inner = self.inner.write();
        let mut document = inner.document.clone();
        codec::write_disabled_worlds(&mut document, &worlds).map_err(OregenError::Persist)?;
        document.save().map_err(OregenError::Persist)?;

        let state = CatalogState {
            disabled_worlds: worlds,
            ..(*inner.state).clone()
        };
        inner.document = document;
        inner.state = Arc::new(state);
        Ok(())
    }

    /// Flip the persisted debug flag and return the new value
    pub fn toggle_debug(&self) -> Result<bool, OregenError> {
        let mut inner = self.inner.write();
        let enabled = !inner.state.debug;
        let mut document = inner.document.clone();
        document
            .set(codec::KEY_DEBUG, enabled)
            .map_err(OregenError::Persist)?;
        document.save().map_err(OregenError::Persist)?;

        let state = CatalogState {
            debug: enabled,
            ..(*inner.state).clone()
        };
        inner.document = document;
        inner.state = Arc::new(state);
        info!(enabled, "Debug mode toggled");
        Ok(enabled)
    }

    /// Copy every top-level key of `old` that also exists in the current document, then
    /// save and rebuild the catalog from the merged document
    pub fn migrate(&self, old: &Document) -> Result<(), OregenError> {
        let mut inner = self.inner.write();
        let mut document = inner.document.clone();
        for key in old.keys("") {
            if !document.contains(&key) {
                continue;
            }
            if let Some(value) = old.get(&key) {
                document
                    .set(&key, value.clone())
                    .map_err(OregenError::Persist)?;
            }
        }
        let state = CatalogState::from_document(&document)?;
        document.save().map_err(OregenError::Persist)?;

        info!(from = %old.path().display(), "Configuration migrated");
        inner.document = document;
        inner.state = Arc::new(state);
        Ok(())
    }

    /// Persist `generators` and publish them. Nothing is published if the save fails.
    fn commit(
        inner: &mut CatalogInner,
        generators: Vec<Arc<GeneratorDefinition>>,
    ) -> Result<(), OregenError> {
        let mut document = inner.document.clone();
        codec::write_generators(&mut document, &generators).map_err(OregenError::Persist)?;
        document.save().map_err(OregenError::Persist)?;

        let state = CatalogState::new(
            generators,
            inner.state.disabled_worlds.clone(),
            inner.state.debug,
        );
        inner.document = document;
        inner.state = Arc::new(state);
        Ok(())
    }
}

fn second_default(state: &CatalogState, name: String) -> OregenError {
    OregenError::InvalidGenerator {
        name,
        reason: format!(
            "'{}' is already the default generator",
            state.default_generator.name
        ),
    }
}

fn validate(definition: &GeneratorDefinition) -> Result<(), OregenError> {
    definition
        .validate()
        .map_err(|reason| OregenError::InvalidGenerator {
            name: definition.name.clone(),
            reason,
        })
}
