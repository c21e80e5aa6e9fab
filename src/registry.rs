//! Process-wide registry of built operators.
//!
//! Each method's operator is built at most once, even when several threads
//! hit the method for the first time together. Construction of different
//! methods proceeds independently: the registry lock is only held to find
//! or create a method's slot, and each slot has its own lock.
//!
//! A slot remembers the declaration it was built from. A later call with the
//! same qualified name but a different declaration is rejected.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::BinderConfig;
use crate::error::{DaoError, Result};
use crate::method::MethodDescriptor;
use crate::operator::{Operator, OperatorFactory};

type Slot = Arc<Mutex<Option<Built>>>;

#[derive(Debug)]
struct Built {
    method: MethodDescriptor,
    operator: Arc<Operator>,
}

/// Maps qualified method names to their shared operators.
#[derive(Debug, Default)]
pub struct OperatorRegistry {
    factory: OperatorFactory,
    slots: RwLock<HashMap<String, Slot>>,
}

impl OperatorRegistry {
    /// Creates an empty registry building with `config`.
    #[must_use]
    pub fn new(config: BinderConfig) -> Self {
        OperatorRegistry {
            factory: OperatorFactory::new(config),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the operator for `method`, building it on first use.
    ///
    /// Failed constructions are not cached: the slot stays empty and the
    /// next call reports the same error again.
    ///
    /// # Errors
    ///
    /// Returns the construction error for a malformed declaration, and
    /// `ConflictingDeclaration` if an operator was already built under the
    /// same qualified name from a different declaration.
    pub fn get_or_build(&self, method: &MethodDescriptor) -> Result<Arc<Operator>> {
        let name = method.qualified_name();
        let slot = self.slot(&name);
        let mut guard = slot.lock();
        if let Some(built) = guard.as_ref() {
            if built.method != *method {
                tracing::warn!(method = %name, "conflicting declaration for built operator");
                return Err(DaoError::ConflictingDeclaration(format!(
                    "{name} is already bound to template {:?}",
                    built.method.template
                )));
            }
            return Ok(Arc::clone(&built.operator));
        }

        let operator = Arc::new(self.factory.build(method).map_err(|err| {
            tracing::debug!(method = %name, error = %err, "operator construction failed");
            err
        })?);
        *guard = Some(Built {
            method: method.clone(),
            operator: Arc::clone(&operator),
        });
        Ok(operator)
    }

    /// Returns the operator for a method name if it was already built.
    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<Arc<Operator>> {
        let slot = self.slots.read().get(qualified_name).cloned()?;
        let guard = slot.lock();
        guard.as_ref().map(|built| Arc::clone(&built.operator))
    }

    /// Returns the number of built operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    /// Returns true if no operator has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, name: &str) -> Slot {
        if let Some(slot) = self.slots.read().get(name) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(name.to_string()).or_default())
    }
}
