use super::VariableId;
use crate::basic_types::HashMap;

#[derive(Clone, Debug, Default)]
pub(crate) struct VariableNames {
    names: Vec<String>,
    by_name: HashMap<String, VariableId>,
}

impl VariableNames {
    /// Get a variable by its name. If several variables share a name, the last one wins.
    pub(crate) fn get_by_name(&self, name: &str) -> Option<VariableId> {
        self.by_name.get(name).copied()
    }

    /// Get the name associated with a variable.
    pub(crate) fn get_name(&self, variable: VariableId) -> &str {
        &self.names[variable.index()]
    }

    /// Add the name of the next variable.
    pub(crate) fn add(&mut self, variable: VariableId, name: String) {
        debug_assert_eq!(variable.index(), self.names.len());

        let _ = self.by_name.insert(name.clone(), variable);
        self.names.push(name);
    }
}
