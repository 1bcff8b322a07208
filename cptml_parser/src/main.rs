//! `cptml`: parse a CPTML file and print its tree and diagnostics
use clap::{Parser, ValueEnum};
use cptml_parser::config::runtime::parse_log_level;
use cptml_parser::config::RuntimeConfig;
use cptml_parser::grammar::ast::{Attribute, Node};
use cptml_parser::pipeline::{self, PipelineError, PipelineOptions, PipelineOutput, PipelineResult};
use cptml_parser::utils::SourceMap;
use cptml_parser::{file_processor, lexical, logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented node tree
    Tree,
    /// Document, diagnostics and metrics as JSON
    Json,
    /// Re-encoded markup
    Markup,
}

#[derive(Parser)]
#[command(name = "cptml", version)]
#[command(about = "Parse CPTML markup and report diagnostics")]
struct Args {
    /// Path to the CPTML document
    #[arg(required_unless_present = "limits")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Print the flat CST without pairing pointy tags
    #[arg(long)]
    cst: bool,

    /// Print the scanned tokens before the tree
    #[arg(long)]
    tokens: bool,

    /// Minimum log level: error, warning, info or debug
    #[arg(long)]
    log_level: Option<String>,

    /// Emit log events as JSON lines
    #[arg(long)]
    structured_logs: bool,

    /// TOML file with runtime preferences
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the compiled-in limits; without FILE also print the logging
    /// preferences and exit
    #[arg(long)]
    limits: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match RuntimeConfig::from_file(path) {
            Ok(config) => config,
            Err(message) => {
                eprintln!("error: {}", message);
                return ExitCode::from(2);
            }
        },
        None => RuntimeConfig::default(),
    };

    if let Some(level) = &args.log_level {
        match parse_log_level(level) {
            Some(level) => config.logging.min_log_level = level,
            None => {
                eprintln!("error: unknown log level '{}'", level);
                return ExitCode::from(2);
            }
        }
    }
    if args.structured_logs {
        config.logging.use_structured_logging = true;
    }
    if args.tokens {
        config.lexical.record_tokens = true;
    }

    if let Err(message) = logging::config::init_runtime_preferences(config.logging.clone())
        .and_then(|()| logging::init_global_logging())
        .and_then(|()| pipeline::init_pipeline_logging())
    {
        eprintln!("error: {}", message);
        return ExitCode::from(2);
    }
    let excerpts = logging::config::include_source_excerpts();

    let Some(path) = args.file.as_deref() else {
        println!("{}", cptml_parser::config::build_info::source_info());
        println!("{}", cptml_parser::config::limits_summary());
        print!("{}", logging::get_system_diagnostics());
        return ExitCode::SUCCESS;
    };
    if args.limits {
        println!("{}", cptml_parser::config::limits_summary());
    }

    let file = match file_processor::process_file(path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code().as_str(), error);
            return ExitCode::FAILURE;
        }
    };

    let name = path.display().to_string();
    let source_map = SourceMap::new(name.as_str(), file.source.as_str());
    let options = PipelineOptions {
        config,
        skip_assembly: args.cst,
    };

    let result = match pipeline::parse_with_options(&file.source, &name, &options) {
        Ok(result) => result,
        Err(error) => {
            if args.tokens {
                let (tokens, _) = lexical::tokenize(&file.source);
                print!("{}", tokens.listing(Some(&source_map)));
            }
            report_fatal(&error, &source_map, excerpts);
            return ExitCode::FAILURE;
        }
    };

    if args.tokens {
        print!("{}", result.tokens.listing(Some(&source_map)));
        if result.tokens.is_truncated() {
            eprintln!("warning: token history truncated");
        }
        println!();
    }

    match args.format {
        Format::Tree => print!("{}", render_tree(&result.document.nodes)),
        Format::Markup => println!("{}", result.document),
        Format::Json => match PipelineOutput::new(&name, &result).to_json() {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("error: failed to serialize output: {}", error);
                return ExitCode::FAILURE;
            }
        },
    }

    report_diagnostics(&result, &source_map, excerpts);
    ExitCode::SUCCESS
}

fn report_fatal(error: &PipelineError, source_map: &SourceMap, excerpts: bool) {
    let code = error.error_code().as_str();
    match error.span() {
        Some(span) if excerpts => {
            eprint!("{}", source_map.format_error(&span, code, &error.to_string()))
        }
        Some(span) => eprintln!(
            "error[{}]: {} at {}:{}",
            code,
            error,
            span.start().line,
            span.start().column
        ),
        None => eprintln!("error[{}]: {}", code, error),
    }
}

fn report_diagnostics(result: &PipelineResult, source_map: &SourceMap, excerpts: bool) {
    for diagnostic in &result.diagnostics {
        let code = diagnostic.error_code().as_str();
        let span = diagnostic.span();
        if excerpts {
            eprint!("{}", source_map.format_warning(&span, code, &diagnostic.to_string()));
        } else {
            eprintln!(
                "warning[{}]: {} at {}:{}",
                code,
                diagnostic,
                span.start().line,
                span.start().column
            );
        }
    }
    if result.suppressed_diagnostics > 0 {
        eprintln!(
            "warning: {} more diagnostics suppressed",
            result.suppressed_diagnostics
        );
    }
}

fn render_tree(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_tree(nodes, 0, &mut out);
    out
}

fn write_tree(nodes: &[Node], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        let line = match node {
            Node::Text(text) => format!("text {:?}", text.text),
            Node::Comment(comment) => format!("comment {:?}", comment.body()),
            Node::CurlyTag(tag) => format!("curly {}{}", tag.name, attributes(&tag.attributes)),
            Node::PointyHead(head) => {
                format!("head {}{}", head.display_name(), attributes(&head.attributes))
            }
            Node::PointyTail(tail) => format!("tail {}", tail.display_name()),
            Node::NodeList(_) => "node_list".to_string(),
            Node::Element(element) => format!(
                "element {}{}",
                element.head.display_name(),
                attributes(&element.head.attributes)
            ),
        };
        out.push_str(&indent);
        out.push_str(&line);
        out.push('\n');

        if !matches!(node, Node::Comment(_)) {
            write_tree(node.children(), depth + 1, out);
        }
    }
}

fn attributes(attributes: &[Attribute]) -> String {
    attributes.iter().map(|attr| format!(" {}", attr)).collect()
}
