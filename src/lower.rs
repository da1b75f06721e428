use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::config::GenOptions;
use crate::inference::PrimaryModel;
use crate::ir::{Catalog, DefinitionSpec};
use crate::preprocess::Preprocessed;

// Render-ready shapes. Everything a template needs is precomputed here so
// the templates stay free of naming rules.

#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    pub banner: Option<String>,
    pub package: Option<String>,
    pub imports: Vec<&'static str>,
    pub structs: Vec<StructView>,
    pub crud: Option<CrudView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructView {
    pub name: String,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub ty: String,
    pub json: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrudView {
    pub name: String,
    pub id_field: String,
    pub id_param: String,      // query parameter carrying the identifier
    pub store_file: String,    // <lowercased name>.json
    pub new_key: String,       // store key expression for a created record
    pub updated_key: String,   // store key expression for an updated record
    pub legacy_placeholders: bool,
}

pub fn lower_to_view(
    header: &Preprocessed,
    catalog: &Catalog,
    primary: Option<&PrimaryModel>,
    options: &GenOptions,
    generated_at: Option<DateTime<Utc>>,
) -> FileView {
    let package = header.package_name()
        .map(str::to_string)
        .or_else(|| options.default_package.clone());

    let banner = generated_at.map(|at| format!(
        "// Code generated by crud-gen at {}. DO NOT EDIT.",
        at.to_rfc3339_opts(SecondsFormat::Secs, true),
    ));

    let crud = primary.map(|p| lower_crud(p, options));

    FileView {
        banner,
        package,
        imports: imports_for(primary),
        structs: catalog.iter().map(lower_struct).collect(),
        crud,
    }
}

fn lower_struct(def: &DefinitionSpec) -> StructView {
    StructView {
        name: def.name.clone(),
        fields: def.fields.iter().map(|f| FieldView {
            name: f.name.clone(),
            ty: f.ty.clone(),
            json: f.name.to_lowercase(),
        }).collect(),
    }
}

fn lower_crud(p: &PrimaryModel, options: &GenOptions) -> CrudView {
    CrudView {
        name: p.name.clone(),
        id_field: p.identifier.name.clone(),
        id_param: p.identifier.name.to_lowercase(),
        store_file: format!("{}.json", p.name.to_lowercase()),
        new_key: store_key(p, "newData"),
        updated_key: store_key(p, "updatedData"),
        legacy_placeholders: options.legacy_placeholders,
    }
}

/// The store is keyed by the identifier's string form.
fn store_key(p: &PrimaryModel, var: &str) -> String {
    if p.identifier.ty == "string" {
        format!("{var}.{}", p.identifier.name)
    } else {
        format!("fmt.Sprint({var}.{})", p.identifier.name)
    }
}

/// Only packages the emitted code actually references; Go rejects unused
/// imports.
fn imports_for(primary: Option<&PrimaryModel>) -> Vec<&'static str> {
    let Some(p) = primary else { return Vec::new() };
    let mut imports = vec!["encoding/json", "net/http", "os"];
    if p.identifier.ty != "string" {
        imports.insert(1, "fmt");
    }
    imports
}
