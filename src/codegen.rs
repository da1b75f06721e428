//! Go source emission.
//!
//! Each fragment (prelude, one declaration per definition, store, the four
//! handlers, load/save) has its own template. Fragments are rendered from
//! the [`FileView`] produced by `lower` and joined with a blank line.
use minijinja::{AutoEscape, Environment, context};

use crate::lower::{CrudView, FileView};

const TEMPLATES: &[(&str, &str)] = &[
    ("prelude.go", include_str!("codegen/templates/prelude.go.j2")),
    ("struct.go", include_str!("codegen/templates/struct.go.j2")),
    ("store.go", include_str!("codegen/templates/store.go.j2")),
    ("create.go", include_str!("codegen/templates/create.go.j2")),
    ("read.go", include_str!("codegen/templates/read.go.j2")),
    ("update.go", include_str!("codegen/templates/update.go.j2")),
    ("delete.go", include_str!("codegen/templates/delete.go.j2")),
    ("persistence.go", include_str!("codegen/templates/persistence.go.j2")),
];

/// Handler templates in emission order.
const CRUD_FRAGMENTS: &[&str] = &["store.go", "create.go", "read.go", "update.go", "delete.go", "persistence.go"];

pub struct Codegen {
    env: Environment<'static>,
    fragments: Vec<String>,
}

impl Codegen {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env, fragments: Vec::new() })
    }

    pub fn emit(&mut self, file: &FileView) -> Result<(), minijinja::Error> {
        let prelude = self.render("prelude.go", context! {
            banner => file.banner,
            package => file.package,
            imports => file.imports,
        })?;
        self.push(prelude);

        for record in &file.structs {
            let decl = self.render("struct.go", context! { record => record })?;
            self.push(decl);
        }

        if let Some(crud) = &file.crud {
            self.emit_crud(crud)?;
        }
        Ok(())
    }

    fn emit_crud(&mut self, crud: &CrudView) -> Result<(), minijinja::Error> {
        for name in CRUD_FRAGMENTS {
            let fragment = self.render(name, context! { crud => crud })?;
            self.push(fragment);
        }
        Ok(())
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    fn push(&mut self, fragment: String) {
        let fragment = fragment.trim_end();
        if !fragment.is_empty() {
            self.fragments.push(fragment.to_string());
        }
    }

    pub fn into_string(self) -> String {
        let mut out = self.fragments.join("\n\n");
        out.push('\n');
        out
    }
}
