//! CLI: definitions text → (Go CRUD source | catalog JSON)
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use crate::config::GenOptions;
use crate::pipeline::{self, Generated};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate JSON-tagged Go record types and CRUD HTTP handlers from struct definitions
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// more logging (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit Go source for each input
    Generate(GenerateOut),
    /// print the parsed catalog as JSON
    Inspect(InspectOut),
    /// run the generator on a built-in example
    Demo(OptionSettings),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct OptionSettings {
    /// JSON options file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// package name used when the input has no `package` line
    #[arg(long)]
    package: Option<String>,

    /// case-insensitive suffix that marks identifier fields
    #[arg(long)]
    identifier_suffix: Option<String>,

    /// keep the update/delete store mutations commented out
    #[arg(long)]
    legacy_placeholders: bool,

    /// fail when a field line cannot be parsed
    #[arg(long)]
    strict: bool,

    /// prepend a `Code generated ... DO NOT EDIT.` banner
    #[arg(long)]
    stamp: bool,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    option_settings: OptionSettings,

    /// output .go file (stdout if omitted); single input only
    #[arg(short, long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// write `<input stem>.go` per input into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct InspectOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    option_settings: OptionSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One loaded input: where it came from and its text.
#[derive(Debug, Clone)]
struct Source {
    label: String,
    path: Option<PathBuf>,
    text: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Source>> {
        let mut sources = Vec::new();
        for raw in &self.input {
            if raw == "-" {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read stdin")?;
                sources.push(Source { label: "<stdin>".to_string(), path: None, text });
                continue;
            }
            for source_path in resolve_file_path_patterns([raw])? {
                let text = std::fs::read_to_string(&source_path).with_context(|| {
                    format!("failed to read source file {}", source_path.display())
                })?;
                sources.push(Source {
                    label: source_path.to_string_lossy().to_string(),
                    path: Some(source_path),
                    text,
                });
            }
        }
        log::debug!("loaded {} input(s)", sources.len());
        Ok(sources)
    }
}

impl OptionSettings {
    fn resolve(&self) -> Result<GenOptions> {
        let mut options = match &self.config {
            Some(path) => GenOptions::load(path)?,
            None => GenOptions::default(),
        };
        if let Some(package) = &self.package {
            options.default_package = Some(package.clone());
        }
        if let Some(suffix) = &self.identifier_suffix {
            if suffix.trim().is_empty() {
                bail!("--identifier-suffix must not be empty");
            }
            options.identifier_suffix = suffix.clone();
        }
        options.legacy_placeholders |= self.legacy_placeholders;
        options.strict_fields |= self.strict;
        options.stamp |= self.stamp;
        Ok(options)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(())
                }
                let options = target.option_settings.resolve()?;
                let sources = target.input_settings.load()?;
                if target.out.is_some() && sources.len() > 1 {
                    bail!("--out takes a single input; use --out-dir for {} inputs", sources.len());
                }

                let file_names = match target.out_dir {
                    Some(_) => output_file_names(&sources)?,
                    None => Vec::new(),
                };

                // each input is an independent run; nothing is written until all succeed
                let results = sources
                    .into_par_iter()
                    .map(|source| -> Result<(Source, Generated)> {
                        let generated = pipeline::generate(&source.text, &options)
                            .with_context(|| format!("failed to generate code for {}", source.label))?;
                        Ok((source, generated))
                    })
                    .collect::<Result<Vec<(Source, Generated)>>>()?;

                let multiple = results.len() > 1;
                for (i, (source, generated)) in results.into_iter().enumerate() {
                    report_dropped(&source, &generated);
                    if let Some(dir) = target.out_dir.as_ref() {
                        let out = dir.join(&file_names[i]);
                        write_output(&out, &generated.source)?;
                        eprintln!("{} {}", "wrote".green(), out.display());
                    } else if let Some(out) = target.out.as_ref() {
                        write_output(out, &generated.source)?;
                    } else if multiple {
                        println!("// ---- {} ----", source.label);
                        println!("{}", generated.source);
                    } else {
                        print!("{}", generated.source);
                    }
                }
                Ok(())
            }
            Command::Inspect(target) => {
                let options = target.option_settings.resolve()?;
                let sources = target.input_settings.load()?;
                let mut report = serde_json::Map::new();
                for source in &sources {
                    let analysis = pipeline::analyze(&source.text, &options)
                        .with_context(|| format!("failed to parse {}", source.label))?;
                    report.insert(source.label.clone(), serde_json::to_value(&analysis)?);
                }
                let report_src = serde_json::to_string_pretty(&report)?;
                if let Some(out) = target.out.as_ref() {
                    write_output(out, &report_src)?;
                } else {
                    println!("{report_src}");
                }
                Ok(())
            }
            Command::Demo(settings) => {
                let options = settings.resolve()?;
                let generated = pipeline::generate(pipeline::DEMO_INPUT, &options)?;
                print!("{}", generated.source);
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report_dropped(source: &Source, generated: &Generated) {
    for d in &generated.dropped {
        eprintln!(
            "{} {}: `{}` skipped unsupported field `{}`",
            "warning:".yellow().bold(),
            source.label,
            d.definition,
            d.text,
        );
    }
}

fn output_file_name(source: &Source) -> String {
    let stem = source.path.as_deref()
        .and_then(Path::file_stem)
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    format!("{stem}.go")
}

/// One `--out-dir` file name per source, in order. Two inputs that would
/// land on the same file are an error.
fn output_file_names(sources: &[Source]) -> Result<Vec<String>> {
    let mut seen = HashMap::<String, &str>::new();
    let mut names = Vec::with_capacity(sources.len());
    for source in sources {
        let name = output_file_name(source);
        if let Some(previous) = seen.insert(name.clone(), &source.label) {
            bail!("{previous} and {} would both be written to {name}", source.label);
        }
        names.push(name);
    }
    Ok(names)
}

fn write_output(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
