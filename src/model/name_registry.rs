use std::collections::HashSet;
use std::sync::Mutex;

/// Names handed out during this application session.
///
/// Append-only. A colliding name gets a single " II" suffix; a third
/// identical name maps onto the same "X II" again.
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: Mutex<HashSet<String>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and register in one critical section, returning the name to use.
    pub fn claim(&self, name: &str) -> String {
        let mut names = match self.names.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let claimed = if names.contains(name) {
            format!("{name} II")
        } else {
            name.to_string()
        };
        names.insert(claimed.clone());
        claimed
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        match self.names.lock() {
            Ok(guard) => guard.contains(name),
            Err(poisoned) => poisoned.into_inner().contains(name),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        match self.names.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
