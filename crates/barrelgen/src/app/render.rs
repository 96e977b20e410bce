//! Module rendering for the two output dialects.

use std::str::FromStr;

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use minijinja::Environment;
use serde::{Deserialize, Serialize};

use crate::domain::model::FileEntry;

/// Supported module dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ModuleFormat {
    /// CommonJS `require`/`module.exports` statements.
    Cjs,
    /// ES `import`/`export default` statements.
    Es,
}

impl ModuleFormat {
    /// Stable identifier used for template lookup and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Cjs => "cjs",
            ModuleFormat::Es => "es",
        }
    }
}

impl FromStr for ModuleFormat {
    type Err = ModuleFormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cjs" | "commonjs" => Ok(ModuleFormat::Cjs),
            "es" | "esm" | "module" => Ok(ModuleFormat::Es),
            other => Err(ModuleFormatParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`ModuleFormat`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ModuleFormatParseError {
    #[error("unknown module format '{0}'")]
    UnknownFormat(String),
}

/// Formatting knobs applied while rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prefix prepended to each emitted import path.
    pub path_prefix: String,
    /// Emit `{ path, module }` records instead of bare references.
    pub export_with_path: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            path_prefix: "./".to_owned(),
            export_with_path: false,
        }
    }
}

/// Renders ordered file entries into a complete module definition.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Create a renderer with the dialect templates loaded.
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
        })
    }

    /// Render the entries, in order, as a module in the requested dialect.
    pub fn render(
        &self,
        format: ModuleFormat,
        entries: &[FileEntry],
        options: &RenderOptions,
    ) -> Result<String> {
        let context = build_template_context(format, entries, options);
        let template = self
            .env
            .get_template(format.as_str())
            .map_err(|err| anyhow!("missing template for format '{}': {err}", format.as_str()))?;
        template
            .render(&context)
            .map_err(|err| anyhow!("failed to render '{}' module: {err}", format.as_str()))
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    // The generated file must end with a newline.
    env.set_keep_trailing_newline(true);
    env.add_template("cjs", CJS_TEMPLATE)
        .map_err(|err| anyhow!("failed to register cjs template: {err}"))?;
    env.add_template("es", ES_TEMPLATE)
        .map_err(|err| anyhow!("failed to register es template: {err}"))?;
    Ok(env)
}

fn build_template_context(
    format: ModuleFormat,
    entries: &[FileEntry],
    options: &RenderOptions,
) -> TemplateContext {
    let mut bindings = Vec::with_capacity(entries.len());
    let mut exports = Vec::with_capacity(entries.len());

    for entry in entries {
        let specifier = escape_single_quotes(&format!("{}{}", options.path_prefix, entry.path));
        bindings.push(match format {
            ModuleFormat::Cjs => format!("const {} = require('{specifier}')", entry.identifier),
            ModuleFormat::Es => format!("import {} from '{specifier}'", entry.identifier),
        });
        exports.push(if options.export_with_path {
            format!(
                "\t{{ path: '{}', module: {} }}",
                escape_single_quotes(&entry.path),
                entry.identifier
            )
        } else {
            format!("\t{}", entry.identifier)
        });
    }

    TemplateContext {
        bindings: bindings.join("\n"),
        exports: exports.join(",\n"),
    }
}

/// Only single quotes are escaped; path values are trusted beyond that.
fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "\\'")
}

#[derive(Serialize)]
struct TemplateContext {
    bindings: String,
    exports: String,
}

const CJS_TEMPLATE: &str = "{{ bindings }}\n\nmodule.exports = [\n{{ exports }}\n]\n";

const ES_TEMPLATE: &str = "{{ bindings }}\n\nexport default [\n{{ exports }}\n]\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::identifier::to_identifier;

    fn entries_for(paths: &[&str]) -> Vec<FileEntry> {
        paths
            .iter()
            .map(|path| FileEntry {
                path: (*path).to_owned(),
                identifier: to_identifier(path),
            })
            .collect()
    }

    #[test]
    fn renders_cjs_module() {
        let renderer = Renderer::new().expect("renderer");
        let rendered = renderer
            .render(
                ModuleFormat::Cjs,
                &entries_for(&["fixtures/one.js", "fixtures/someDirectory/two.js"]),
                &RenderOptions::default(),
            )
            .expect("render");

        assert_eq!(
            rendered,
            "const fixtures$47$one$46$js = require('./fixtures/one.js')\n\
             const fixtures$47$someDirectory$47$two$46$js = require('./fixtures/someDirectory/two.js')\n\
             \n\
             module.exports = [\n\
             \tfixtures$47$one$46$js,\n\
             \tfixtures$47$someDirectory$47$two$46$js\n\
             ]\n"
        );
    }

    #[test]
    fn es_output_changes_only_keywords() {
        let renderer = Renderer::new().expect("renderer");
        let entries = entries_for(&["fixtures/one.js", "fixtures/someDirectory/two.js"]);
        let rendered = renderer
            .render(ModuleFormat::Es, &entries, &RenderOptions::default())
            .expect("render");

        assert_eq!(
            rendered,
            "import fixtures$47$one$46$js from './fixtures/one.js'\n\
             import fixtures$47$someDirectory$47$two$46$js from './fixtures/someDirectory/two.js'\n\
             \n\
             export default [\n\
             \tfixtures$47$one$46$js,\n\
             \tfixtures$47$someDirectory$47$two$46$js\n\
             ]\n"
        );
    }

    #[test]
    fn export_with_path_pairs_path_and_reference() {
        let renderer = Renderer::new().expect("renderer");
        let options = RenderOptions {
            path_prefix: "/wat/".to_owned(),
            export_with_path: true,
        };
        let rendered = renderer
            .render(ModuleFormat::Cjs, &entries_for(&["one.js"]), &options)
            .expect("render");

        assert!(rendered.contains("const one$46$js = require('/wat/one.js')"));
        // The record keeps the original path, untouched by the prefix.
        assert!(rendered.contains("\t{ path: 'one.js', module: one$46$js }"));
        assert!(!rendered.contains("path: '/wat/one.js'"));
    }

    #[test]
    fn escapes_single_quotes_in_paths() {
        let renderer = Renderer::new().expect("renderer");
        let options = RenderOptions {
            export_with_path: true,
            ..RenderOptions::default()
        };
        let rendered = renderer
            .render(ModuleFormat::Cjs, &entries_for(&["it's.js"]), &options)
            .expect("render");

        assert!(rendered.contains("require('./it\\'s.js')"));
        assert!(rendered.contains("path: 'it\\'s.js'"));
    }

    #[test]
    fn renders_an_empty_entry_list() {
        let renderer = Renderer::new().expect("renderer");
        let rendered = renderer
            .render(ModuleFormat::Cjs, &[], &RenderOptions::default())
            .expect("render");

        assert_eq!(rendered, "\n\nmodule.exports = [\n\n]\n");
    }

    #[test]
    fn parses_format_names_and_aliases() {
        assert_eq!("cjs".parse::<ModuleFormat>().unwrap(), ModuleFormat::Cjs);
        assert_eq!("esm".parse::<ModuleFormat>().unwrap(), ModuleFormat::Es);
        assert_eq!(
            "amd".parse::<ModuleFormat>().unwrap_err(),
            ModuleFormatParseError::UnknownFormat("amd".to_owned())
        );
    }
}
