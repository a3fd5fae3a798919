/// Generation driver that orchestrates a full run
///
/// A run loads the manifest, renders every unit into memory, and only then
/// writes. Any failure while rendering aborts before a single file is
/// touched, so the output tree never mixes fresh and stale code.

use crate::cache::OptionCache;
use crate::codegen::CommandCompiler;
use crate::error::{CompileError, Result};
use crate::globals::global_options_file;
use crate::kittens::{kitten_cli, wrapped_kittens};
use crate::manifest::{output_path, Manifest};
use crate::template::Template;
use crate::writer::{GeneratedUnit, OutputWriter};
use optgen_spec::CompletionSpec;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Result of a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutput {
    /// Every unit produced, in generation order
    pub units: Vec<PathBuf>,
    /// Units whose file content changed
    pub changed: Vec<PathBuf>,
}

/// Options for a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Manifest file
    pub manifest: PathBuf,
    /// Output root, overriding the manifest's
    pub output_root: Option<PathBuf>,
    /// Report changes without writing
    pub dry_run: bool,
}

impl GenerateOptions {
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            output_root: None,
            dry_run: false,
        }
    }

    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_root = Some(dir.into());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// The generator
pub struct Generator {
    options: GenerateOptions,
    cache: OptionCache,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            cache: OptionCache::new(),
        }
    }

    /// Run the full pipeline: load, render everything, then write
    pub fn run(&mut self) -> Result<GenerateOutput> {
        // Every run starts from the specs as they are on disk now
        self.cache.clear();
        let manifest = Manifest::load(&self.options.manifest)?;
        let units = self.render_units(&manifest)?;

        let mut writer = OutputWriter::new(&manifest.generator).dry_run(self.options.dry_run);
        for unit in &units {
            writer.write_unit(unit)?;
        }

        let changed = writer.into_changed();
        info!(units = units.len(), changed = changed.len(), "generation finished");
        Ok(GenerateOutput {
            units: units.into_iter().map(|u| u.path).collect(),
            changed,
        })
    }

    /// Directory the manifest's relative paths are resolved against
    fn base_dir(&self) -> PathBuf {
        match self.options.manifest.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn output_root(&self, manifest: &Manifest) -> PathBuf {
        if let Some(root) = &self.options.output_root {
            return root.clone();
        }
        let base = self.base_dir();
        match &manifest.output_root {
            Some(root) => base.join(root),
            None => base,
        }
    }

    /// Render every unit the manifest describes, without writing anything
    pub fn render_units(&mut self, manifest: &Manifest) -> Result<Vec<GeneratedUnit>> {
        let base = self.base_dir();
        let root = self.output_root(manifest);
        let mut units = Vec::new();

        for spec in &manifest.enums {
            debug!(path = %spec.path, "rendering enum {}", spec.type_name);
            units.push(GeneratedUnit::new(root.join(&spec.path), spec.render()));
        }

        self.render_commands(manifest, &base, &root, &mut units)?;

        if let Some(globals) = &manifest.global_options {
            let text = globals.options.load(&base)?;
            let options = self.cache.get_or_parse("global", &text)?;
            debug!(count = options.len(), "rendering global options");
            units.push(GeneratedUnit::new(
                root.join(&globals.output),
                global_options_file(&globals.package, &manifest.cli_import, &options),
            ));
        }

        if let Some(kittens) = &manifest.kittens {
            for kitten in wrapped_kittens(&base.join(&kittens.wrapper_script))? {
                let docs = kittens.docs.get(&kitten).ok_or_else(|| {
                    CompileError::resource_missing(
                        &self.options.manifest,
                        format!("no CLI docs for wrapped kitten {}", kitten),
                    )
                })?;
                let text = docs.options.load(&base)?;
                let options = self.cache.get_or_parse(&format!("kitten:{}", kitten), &text)?;
                let args_completion = docs
                    .args_completion
                    .as_deref()
                    .map(CompletionSpec::parse)
                    .transpose()
                    .map_err(|e| CompileError::parse(format!("argument completion of {}", kitten), e))?;
                debug!(kitten = %kitten, options = options.len(), "rendering kitten CLI");
                units.push(GeneratedUnit::new(
                    root.join(output_path(&kittens.output, &kitten)),
                    kitten_cli(&kitten, docs, &options, args_completion.as_ref(), &manifest.cli_import),
                ));
            }
        }

        Ok(units)
    }

    fn render_commands(
        &mut self,
        manifest: &Manifest,
        base: &Path,
        root: &Path,
        units: &mut Vec<GeneratedUnit>,
    ) -> Result<()> {
        if manifest.commands.is_empty() {
            return Ok(());
        }
        let template = match &manifest.command_template {
            Some(source) => Template::new(source.load(base)?),
            None => {
                return Err(CompileError::resource_missing(
                    &self.options.manifest,
                    "commands are listed but no command_template is set",
                ));
            }
        };
        let compiler = CommandCompiler::new(&manifest.rules).generator(manifest.generator.as_str());

        for entry in &manifest.commands {
            let options_text = entry.options.load(base)?;
            let options = self.cache.get_or_parse(&format!("rc:{}", entry.name), &options_text)?;
            let protocol_spec = entry.protocol_spec.load(base)?;
            let cmd = entry.to_spec(options, protocol_spec);
            let code = compiler.generate(&cmd, &template)?;
            units.push(GeneratedUnit::new(root.join(output_path(&manifest.command_output, &cmd.name)), code));
        }
        Ok(())
    }

    /// Parsed option lists retained by this generator
    pub fn cache(&self) -> &OptionCache {
        &self.cache
    }

    /// Forget cached option lists so the next run reparses everything
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
