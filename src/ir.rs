// Parsed record definitions. Plain data, no parsing or rendering here.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,    // declaration order
    pub is_primary: bool,          // some field carries the identifier suffix
    pub identifier_field: String,  // empty unless selected by inference
}

impl DefinitionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            is_primary: false,
            identifier_field: String::new(),
        }
    }
}

/// Definitions keyed by name, iterated in declaration order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    definitions: IndexMap<String, DefinitionSpec>,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    /// Insert or replace. A replaced definition keeps its original position.
    /// Returns the previous definition under the same name, if any.
    pub fn insert(&mut self, def: DefinitionSpec) -> Option<DefinitionSpec> {
        self.definitions.insert(def.name.clone(), def)
    }

    pub fn get(&self, name: &str) -> Option<&DefinitionSpec> {
        self.definitions.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DefinitionSpec> {
        self.definitions.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefinitionSpec> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize { self.definitions.len() }

    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(name: &str, fields: &[(&str, &str)]) -> DefinitionSpec {
        let mut d = DefinitionSpec::new(name);
        d.fields = fields.iter()
            .map(|(n, t)| FieldSpec { name: n.to_string(), ty: t.to_string() })
            .collect();
        d
    }

    #[test]
    fn catalog_keeps_declaration_order() {
        let mut c = Catalog::new();
        c.insert(def("Zeta", &[]));
        c.insert(def("Alpha", &[]));
        c.insert(def("Mid", &[]));
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn replacing_a_definition_keeps_its_slot() {
        let mut c = Catalog::new();
        c.insert(def("A", &[("X", "int")]));
        c.insert(def("B", &[]));
        let prev = c.insert(def("A", &[("Y", "string")]));
        assert!(prev.is_some());
        assert_eq!(c.len(), 2);
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(c.get("A").unwrap().fields[0].name, "Y");
    }

    #[test]
    fn field_serializes_type_key() {
        let f = FieldSpec { name: "ID".into(), ty: "int".into() };
        assert_eq!(serde_json::to_string(&f).unwrap(), r#"{"name":"ID","type":"int"}"#);
    }
}
