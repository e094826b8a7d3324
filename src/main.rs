//! content2html - generate complete documents from content fragments

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use content2html::{Minifier, MinifyErrors, Pipeline, PipelineConfig, Template};

#[derive(Parser)]
#[command(name = "content2html")]
#[command(version, about = "Generate complete, minified HTML documents from content files", long_about = None)]
#[command(after_help = "EXAMPLES:
    content2html posts/*.content                  Write posts/*.html
    content2html --out public posts/*.content     Write public/posts/*.html
    content2html --template page.hbs a.content    Use page.hbs as the wrapper")]
struct Cli {
    /// Content files to convert
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Page template ({{Title}} is escaped, {{{Body}}} is raw)
    #[arg(short, long, value_name = "PATH", default_value = "template.html")]
    template: PathBuf,

    /// Output directory (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Flank en and em dashes with hair spaces
    #[arg(long)]
    hair_spaces: bool,

    /// Selector for the title heading
    #[arg(long, value_name = "SELECTOR", default_value = content2html::title::DEFAULT_TITLE_SELECTOR)]
    title_selector: String,

    /// Write the unminified page when minification fails
    #[arg(long)]
    keep_unminified: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn config(&self) -> PipelineConfig {
        let minify_errors = if self.keep_unminified {
            MinifyErrors::PassThrough
        } else {
            MinifyErrors::Fail
        };
        PipelineConfig::new()
            .with_output_dir(self.out.clone().unwrap_or_default())
            .with_hair_spaces(self.hair_spaces)
            .with_title_selector(&self.title_selector)
            .with_minify_errors(minify_errors)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let template = match Template::from_file(&cli.template) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::new(template, Arc::new(Minifier::default()), cli.config()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let report = pipeline.run(&cli.inputs);
    for failure in &report.failed {
        eprintln!("error: {failure}");
    }
    if !cli.quiet {
        for (_, output) in &report.written {
            println!("{}", output.display());
        }
    }

    ExitCode::SUCCESS
}
