use std::collections::HashMap;

use super::value::Value;

/// Index of a scope in the [`Environments`] arena.
pub type EnvId = usize;

#[derive(Debug, Default)]
pub struct Environment<'a> {
    store: HashMap<String, Value<'a>>,
    outer: Option<EnvId>,
}

/// Every scope created during a run. Scopes are never freed, so a closure
/// can hold on to its defining scope by index.
#[derive(Debug)]
pub struct Environments<'a> {
    arena: Vec<Environment<'a>>,
}

impl<'a> Environments<'a> {
    /// Creates the arena with the global scope at index 0.
    pub fn new() -> Self {
        Environments {
            arena: vec![Environment::default()],
        }
    }

    pub fn global(&self) -> EnvId {
        0
    }

    pub fn enclose(&mut self, outer: EnvId) -> EnvId {
        self.arena.push(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        });

        self.arena.len() - 1
    }

    /// Binds `name` in exactly the scope `env`, replacing any earlier binding there.
    pub fn define(&mut self, env: EnvId, name: String, value: Value<'a>) {
        if let Some(environment) = self.arena.get_mut(env) {
            environment.store.insert(name, value);
        }
    }

    pub fn get(&self, env: EnvId, name: &str) -> Option<&Value<'a>> {
        let mut current = Some(env);

        while let Some(id) = current {
            let environment = self.arena.get(id)?;
            if let Some(value) = environment.store.get(name) {
                return Some(value);
            }
            current = environment.outer;
        }

        None
    }

    /// Overwrites the binding in the nearest scope that already holds `name`.
    /// Returns `false` when no scope on the chain does.
    pub fn assign(&mut self, env: EnvId, name: &str, value: Value<'a>) -> bool {
        let mut current = Some(env);

        while let Some(id) = current {
            let environment = match self.arena.get_mut(id) {
                Some(environment) => environment,
                None => return false,
            };

            if let Some(slot) = environment.store.get_mut(name) {
                *slot = value;
                return true;
            }
            current = environment.outer;
        }

        false
    }
}

impl Default for Environments<'_> {
    fn default() -> Self {
        Environments::new()
    }
}
