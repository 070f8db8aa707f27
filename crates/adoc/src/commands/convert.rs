//! `adoc convert` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use adoc_config::{CliSettings, Config};
use adoc_parser::{Diagnostic, Parser, ParserConfig};
use adoc_renderer::Html5Renderer;
use adoc_types::DocumentAttributes;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Input path that selects standard input.
const STDIN: &str = "-";

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// AsciiDoc file to convert, or `-` for standard input.
    input: PathBuf,

    /// Write HTML to this file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Set a document attribute (`name=value`, or `name` for an empty value).
    #[arg(short = 'a', long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,

    /// Resolve includes against this directory instead of the input's.
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Maximum nesting depth of included files.
    #[arg(long, value_name = "N")]
    max_include_depth: Option<usize>,

    /// Path to configuration file (default: auto-discover adoc.toml).
    #[arg(short, long, env = "ADOC_CONFIG")]
    config: Option<PathBuf>,

    /// Render the body only, without the surrounding page.
    #[arg(long)]
    no_standalone: bool,

    /// Print the normalized document tree as JSON instead of HTML.
    #[arg(long)]
    dump_tree: bool,

    /// Log parse and include progress at INFO level.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, parsing or rendering fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;

        let input = (self.input.as_os_str() != STDIN).then_some(self.input.as_path());
        let source = match input {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut source = String::new();
                std::io::stdin().read_to_string(&mut source)?;
                source
            }
        };

        let conversion = convert(&source, input, &config, self.dump_tree)?;
        for diagnostic in &conversion.diagnostics {
            output.diagnostic(diagnostic);
        }

        match &self.output {
            Some(path) => {
                std::fs::write(path, &conversion.output)?;
                output.written(path);
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(conversion.output.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
        }
        output.summary(conversion.diagnostics.len());
        Ok(())
    }

    /// Overrides for the loaded configuration.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            attributes: self.attributes.clone(),
            base_dir: self.base_dir.clone(),
            max_include_depth: self.max_include_depth,
            standalone: self.no_standalone.then_some(false),
        }
    }
}

/// Converted output and the problems found on the way.
pub(crate) struct Conversion {
    pub(crate) output: String,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

/// Parse `source` and render it as configured.
///
/// Includes resolve against the configured base directory, else the
/// directory of `input`, else the current directory.
pub(crate) fn convert(
    source: &str,
    input: Option<&Path>,
    config: &Config,
    dump_tree: bool,
) -> Result<Conversion, CliError> {
    let base_dir = config
        .include_resolved
        .base_dir
        .clone()
        .or_else(|| input.and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let attributes: DocumentAttributes = config
        .document
        .attributes
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let mut parser_config = ParserConfig::new()
        .with_base_dir(&base_dir)
        .with_max_include_depth(config.include_resolved.max_depth)
        .with_attributes(attributes);
    if let Some(path) = input {
        parser_config = parser_config.with_source_path(path);
    } else if let Some(filename) = &config.document.filename {
        parser_config = parser_config.with_source_path(base_dir.join(filename));
    }

    let result = Parser::with_config(parser_config).parse(source)?;
    tracing::info!(
        elements = result.document.elements.len(),
        diagnostics = result.diagnostics.len(),
        "Parsed document"
    );

    let output = if dump_tree {
        serde_json::to_string_pretty(&result.document)?
    } else {
        let renderer = Html5Renderer::new();
        if config.output.standalone {
            renderer.render_document(&result.document)?
        } else {
            renderer.render_body(&result.document)?
        }
    };
    Ok(Conversion {
        output,
        diagnostics: result.diagnostics,
    })
}

/// Parse a `name=value` attribute argument.
fn parse_attribute(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg.split_once('=').unwrap_or((arg, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("attribute name cannot be empty in '{arg}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}
