//! Command implementations.

use std::path::{Path, PathBuf};

use cfn_check_yaml::Document;
use fs_err as fs;
use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

use crate::error::Error;
use crate::opt::{RenderOpts, ValidateOpts};
use crate::render::{
    InputContext, RenderConfig, RenderInputs, parse_key_value_pairs, render_template,
};
use crate::validation::{Collection, ValidationSet, builtin_collections};

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_document(path: &Path) -> Result<Document, Error> {
    Document::parse(&read(path)?).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Stages CLI `key=value` lists into structured render inputs, loading every
/// `!ImportValue` document up front.
fn stage_inputs(opts: &RenderOpts) -> Result<RenderInputs, Error> {
    let mut inputs = RenderInputs {
        parameters: parse_key_value_pairs(&opts.parameters),
        references: parse_key_value_pairs(&opts.references),
        attributes: parse_key_value_pairs(&opts.attributes),
        selected_mappings: parse_key_value_pairs(&opts.mappings),
        availability_zones: opts.availability_zones.clone(),
        ..RenderInputs::default()
    };
    for (file, export_key) in parse_key_value_pairs(&opts.import_values) {
        let document = load_document(Path::new(&file))?;
        inputs.import_values.insert(file, (export_key, document));
    }
    Ok(inputs)
}

pub fn render(opts: RenderOpts) -> Result<(), Error> {
    let mut document = load_document(&opts.path)?;
    let inputs = stage_inputs(&opts)?;
    let ctx = InputContext::build(document.root(), inputs);
    let config = if opts.tags.is_empty() {
        RenderConfig::default()
    } else {
        RenderConfig::with_tags(opts.tags.iter().cloned())
    };

    render_template(&mut document, &ctx, &config);

    let rendered = document.to_yaml_string().map_err(|source| Error::Yaml {
        path: opts.path.clone(),
        source,
    })?;
    match &opts.output_file {
        Some(output) => {
            fs::write(output, rendered).map_err(|source| Error::Io {
                path: output.clone(),
                source,
            })?;
            tracing::info!("{} template rendered to {}", opts.path.display(), output.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn matches_pattern(matcher: &Option<GlobMatcher>, path: &Path) -> bool {
    match matcher {
        Some(glob) => path.file_name().is_some_and(|name| glob.is_match(name)),
        None => path
            .extension()
            .is_some_and(|ext| ext == "yml" || ext == "yaml"),
    }
}

/// A single file stands for itself; a directory is walked for templates
/// matching the pattern, in file-name order.
fn discover_templates(path: &Path, pattern: Option<&str>) -> Result<Vec<PathBuf>, Error> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(Error::Input(format!(
            "missing template file {}",
            path.display()
        )));
    }

    let matcher = pattern
        .map(|p| {
            Glob::new(p)
                .map(|glob| glob.compile_matcher())
                .map_err(|err| Error::Input(format!("invalid file pattern `{p}`: {err}")))
        })
        .transpose()?;

    let mut templates = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|err| Error::Input(err.to_string()))?;
        if entry.file_type().is_file() && matches_pattern(&matcher, entry.path()) {
            templates.push(entry.path().to_path_buf());
        }
    }
    Ok(templates)
}

pub fn validate(opts: ValidateOpts) -> Result<(), Error> {
    let templates = discover_templates(&opts.path, opts.file_pattern.as_deref())?;
    if templates.is_empty() {
        return Err(Error::Input(format!(
            "no template matches pattern under {}",
            opts.path.display()
        )));
    }

    let mut documents = Vec::new();
    for template in templates {
        let mut document = load_document(&template)?;
        // Validation sees the rendered tree: template-local defaults are
        // applied, everything unresolvable stays symbolic.
        let ctx = InputContext::build(document.root(), RenderInputs::default());
        render_template(&mut document, &ctx, &RenderConfig::default());
        documents.push((template, document.into_root()));
    }

    let collections: Vec<Collection> = builtin_collections()
        .into_iter()
        .filter(|collection| collection.name == opts.rules)
        .collect();
    if collections.is_empty() {
        return Err(Error::Input(format!(
            "unknown rule collection `{}`",
            opts.rules
        )));
    }

    let template_count = documents.len();
    let set = ValidationSet::new(collections, opts.flags.clone());
    let checks = set.validate(&documents)?;
    tracing::info!("{checks} validations met for {template_count} templates");
    Ok(())
}
