//! One generation run: text → catalog → primary model → Go source.
//!
//! Every stage hands its result to the next as a value, so independent runs
//! share nothing and can execute concurrently.
use chrono::Utc;
use serde::Serialize;

use crate::codegen::Codegen;
use crate::config::GenOptions;
use crate::error::GenError;
use crate::extract::{DroppedField, extract};
use crate::inference::select_primary;
use crate::ir::Catalog;
use crate::lower::lower_to_view;
use crate::preprocess::split_header;

/// Input used by the `demo` subcommand.
pub const DEMO_INPUT: &str = r#"
    package main

    type YourStruct struct {
        ID int
        Name string
        Email string
    }

    type AnotherStruct struct {
        Count int
        Value string
    }
"#;

#[derive(Debug, Clone)]
pub struct Generated {
    pub source: String,
    pub dropped: Vec<DroppedField>,
}

/// Parse-only view of a run, used by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub header: String,
    pub primary: Option<String>,
    pub definitions: Catalog,
    pub dropped: Vec<DroppedField>,
}

pub fn analyze(input: &str, options: &GenOptions) -> Result<Analysis, GenError> {
    let pp = split_header(input);
    let mut extraction = extract(&pp.body, &options.identifier_suffix)?;
    let primary = select_primary(&mut extraction.catalog, &options.identifier_suffix);
    Ok(Analysis {
        header: pp.header,
        primary: primary.map(|p| p.name),
        definitions: extraction.catalog,
        dropped: extraction.dropped,
    })
}

pub fn generate(input: &str, options: &GenOptions) -> Result<Generated, GenError> {
    let pp = split_header(input);
    let mut extraction = extract(&pp.body, &options.identifier_suffix)?;
    check_dropped(&extraction.dropped, options)?;
    let primary = select_primary(&mut extraction.catalog, &options.identifier_suffix);

    let generated_at = options.stamp.then(Utc::now);
    let view = lower_to_view(&pp, &extraction.catalog, primary.as_ref(), options, generated_at);
    let mut cg = Codegen::new()?;
    cg.emit(&view)?;

    log::info!(
        "generated {} definition(s){}",
        extraction.catalog.len(),
        primary.as_ref().map(|p| format!(", CRUD for `{}`", p.name)).unwrap_or_default(),
    );
    Ok(Generated { source: cg.into_string(), dropped: extraction.dropped })
}

fn check_dropped(dropped: &[DroppedField], options: &GenOptions) -> Result<(), GenError> {
    if !options.strict_fields || dropped.is_empty() {
        return Ok(());
    }
    let mut definitions: Vec<String> = Vec::new();
    for d in dropped {
        if !definitions.contains(&d.definition) {
            definitions.push(d.definition.clone());
        }
    }
    Err(GenError::DroppedFields { count: dropped.len(), definitions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use pretty_assertions::assert_eq;
    use test_log::test;

    #[test]
    fn demo_input_end_to_end() {
        let out = generate(DEMO_INPUT, &GenOptions::default()).unwrap();
        let expected_head = concat!(
            "package main\n",
            "\n",
            "import (\n",
            "\t\"encoding/json\"\n",
            "\t\"fmt\"\n",
            "\t\"net/http\"\n",
            "\t\"os\"\n",
            ")\n",
            "\n",
            "type YourStruct struct {\n",
            "\tID int `json:\"id\"`\n",
            "\tName string `json:\"name\"`\n",
            "\tEmail string `json:\"email\"`\n",
            "}\n",
            "\n",
            "type AnotherStruct struct {\n",
            "\tCount int `json:\"count\"`\n",
            "\tValue string `json:\"value\"`\n",
            "}\n",
            "\n",
            "var dataMap = make(map[string]YourStruct)\n",
            "\n",
            "func CreateYourStruct(w http.ResponseWriter, r *http.Request) {\n",
        );
        assert_eq!(&out.source[..expected_head.len()], expected_head);
        assert!(out.source.contains("dataMap[fmt.Sprint(newData.ID)] = newData"));
        assert!(out.source.contains("saveToJSONFile(\"yourstruct.json\")"));
        assert!(out.source.contains("Get(\"id\")"));
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn order_scenario() {
        let src = "package main\ntype Order struct {\n OrderID string\n Total int\n}";
        let out = generate(src, &GenOptions::default()).unwrap().source;
        assert!(out.contains("var dataMap = make(map[string]Order)"));
        assert_eq!(out.matches("func ").count(), 6);
        for sig in ["CreateOrder", "ReadOrder", "UpdateOrder", "DeleteOrder"] {
            assert!(out.contains(&format!("func {sig}(w http.ResponseWriter, r *http.Request)")));
        }
        assert!(out.contains("\"order.json\""));
        assert!(!out.contains("\"fmt\""));
    }

    #[test]
    fn single_line_definition_gets_handlers() {
        let src = "package main\ntype Order struct { OrderID string Total int }";
        let out = generate(src, &GenOptions::default()).unwrap();
        assert!(out.dropped.is_empty());
        assert!(out.source.contains("\tOrderID string `json:\"orderid\"`\n\tTotal int `json:\"total\"`\n"));
        assert!(out.source.contains("func CreateOrder(w http.ResponseWriter, r *http.Request)"));
    }

    #[test]
    fn no_primary_means_no_store_or_handlers() {
        let src = "package main\ntype A struct { Count int }\ntype B struct { Value string }";
        let out = generate(src, &GenOptions::default()).unwrap().source;
        assert!(out.contains("type A struct {"));
        assert!(out.contains("type B struct {"));
        assert!(!out.contains("dataMap"));
        assert!(!out.contains("func "));
        assert!(!out.contains("import"));
    }

    #[test]
    fn malformed_input_yields_no_output() {
        let err = generate("package main\ntype Order struct {\n OrderID string\n", &GenOptions::default()).unwrap_err();
        assert!(matches!(err, GenError::Format(FormatError::Unterminated { .. })));
    }

    #[test]
    fn dropped_fields_surface_or_fail_in_strict_mode() {
        let src = "type Bag struct {\n BagID string\n Items []string\n}";
        let out = generate(src, &GenOptions::default()).unwrap();
        assert_eq!(out.dropped.len(), 1);
        assert!(!out.source.contains("Items"));

        let strict = GenOptions { strict_fields: true, ..GenOptions::default() };
        match generate(src, &strict).unwrap_err() {
            GenError::DroppedFields { count, definitions } => {
                assert_eq!(count, 1);
                assert_eq!(definitions, vec!["Bag".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stamp_adds_generated_banner() {
        let options = GenOptions { stamp: true, ..GenOptions::default() };
        let out = generate(DEMO_INPUT, &options).unwrap().source;
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("// Code generated by crud-gen at "));
        assert!(first.ends_with(". DO NOT EDIT."));
    }

    #[test]
    fn runs_do_not_share_headers() {
        let a = generate("package alpha\ntype A struct { X int }", &GenOptions::default()).unwrap();
        let b = generate("type B struct { Y int }", &GenOptions::default()).unwrap();
        assert!(a.source.starts_with("package alpha\n"));
        assert!(b.source.starts_with("type B struct"));
    }

    #[test]
    fn analyze_reports_catalog_and_primary() {
        let analysis = analyze(DEMO_INPUT, &GenOptions::default()).unwrap();
        assert_eq!(analysis.header, "package main");
        assert_eq!(analysis.primary.as_deref(), Some("YourStruct"));
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["definitions"]["YourStruct"]["identifier_field"], "ID");
        assert_eq!(json["definitions"]["AnotherStruct"]["is_primary"], false);
        assert_eq!(json["definitions"]["YourStruct"]["fields"][1]["type"], "string");
    }
}
