//! Primary-model inference.
//!
//! The primary definition is the one that gets a store, CRUD handlers and
//! load/save routines. It is the first definition, in declaration order,
//! flagged during extraction as carrying an identifier-suffixed field.
//! Its identifier is the first field (again in declaration order) whose
//! name ends with the suffix.
use crate::ir::{Catalog, FieldSpec};

// ------------------------------- Policy ---------------------------------- //

pub const DEFAULT_IDENTIFIER_SUFFIX: &str = "id";

/// Case-insensitive suffix test shared by extraction and inference so both
/// stages agree on what an identifier looks like.
pub fn has_identifier_suffix(name: &str, suffix: &str) -> bool {
    name.to_lowercase().ends_with(&suffix.to_lowercase())
}

// ------------------------------- Selection -------------------------------- //

/// The selected primary definition, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryModel {
    pub name: String,
    pub identifier: FieldSpec,
}

pub fn find_identifier<'a>(fields: &'a [FieldSpec], suffix: &str) -> Option<&'a FieldSpec> {
    fields.iter().find(|f| has_identifier_suffix(&f.name, suffix))
}

/// Pick the primary definition and record its identifier field in the
/// catalog. Returns `None` when no definition qualifies.
pub fn select_primary(catalog: &mut Catalog, suffix: &str) -> Option<PrimaryModel> {
    let candidates: Vec<String> = catalog.iter()
        .filter(|d| d.is_primary)
        .map(|d| d.name.clone())
        .collect();

    let Some(name) = candidates.first() else {
        log::debug!("no primary definition; emitting declarations only");
        return None;
    };
    if candidates.len() > 1 {
        log::info!(
            "several primary candidates ({}); using `{name}`, the first declared",
            candidates.join(", "),
        );
    }

    let def = catalog.get_mut(name)?;
    let identifier = find_identifier(&def.fields, suffix)?.clone();
    def.identifier_field = identifier.name.clone();
    log::debug!("primary `{}` keyed by `{}`", def.name, identifier.name);

    Some(PrimaryModel { name: def.name.clone(), identifier })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use test_log::test;

    fn catalog(src: &str) -> Catalog {
        extract(src, DEFAULT_IDENTIFIER_SUFFIX).unwrap().catalog
    }

    #[test]
    fn suffix_rules() {
        assert!(has_identifier_suffix("ID", "id"));
        assert!(has_identifier_suffix("UserID", "id"));
        assert!(has_identifier_suffix("order_id", "ID"));
        assert!(!has_identifier_suffix("Identity", "id"));
        assert!(!has_identifier_suffix("Name", "id"));
    }

    #[test]
    fn first_identifier_field_is_selected() {
        let mut c = catalog("type User struct {\n Name string\n UserID string\n GroupID int\n}");
        let primary = select_primary(&mut c, "id").unwrap();
        assert_eq!(primary.name, "User");
        assert_eq!(primary.identifier, FieldSpec { name: "UserID".into(), ty: "string".into() });
        assert_eq!(c.get("User").unwrap().identifier_field, "UserID");
    }

    #[test]
    fn declaration_order_breaks_ties() {
        let src = "type Note struct { Text string }\ntype Order struct { OrderID string }\ntype Item struct { ItemID int }";
        for _ in 0..8 {
            let mut c = catalog(src);
            let primary = select_primary(&mut c, "id").unwrap();
            assert_eq!(primary.name, "Order");
            assert_eq!(c.get("Item").unwrap().identifier_field, "");
            assert!(c.get("Item").unwrap().is_primary);
        }
    }

    #[test]
    fn no_candidate_means_no_primary() {
        let mut c = catalog("type A struct { Count int }\ntype B struct { Value string }");
        assert!(select_primary(&mut c, "id").is_none());
        assert!(c.iter().all(|d| d.identifier_field.is_empty()));
    }
}
