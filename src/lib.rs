//! # content2html
//!
//! Turns markup content fragments into complete, minified HTML documents.
//!
//! Each fragment's first `<h1>` becomes the document title, the fragment is
//! embedded in a page template, and the rendered page is minified and written
//! next to the input (or under an output directory) with an `.html`
//! extension.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use content2html::{Minifier, Pipeline, PipelineConfig, Template};
//!
//! let template = Template::from_file("template.html")?;
//! let config = PipelineConfig::default().with_output_dir("public");
//! let pipeline = Pipeline::new(template, Arc::new(Minifier::default()), config)?;
//!
//! let report = pipeline.run(["posts/hello.content", "posts/world.content"]);
//! for failure in &report.failed {
//!     eprintln!("error: {failure}");
//! }
//! # Ok::<(), content2html::Error>(())
//! ```
//!
//! ## Building blocks
//!
//! The stages are usable on their own:
//!
//! ```
//! use content2html::{extract_title, html_pathname, use_hair_spaces};
//!
//! assert_eq!(extract_title("<h1>Hello</h1>").unwrap(), "Hello");
//! assert_eq!(
//!     html_pathname("foo/bar/quux.content", "out").unwrap(),
//!     std::path::Path::new("out/foo/bar/quux.html")
//! );
//! assert_eq!(use_hair_spaces("a — b"), "a\u{200A}—\u{200A}b");
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod minify;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod title;
pub mod typography;

pub use config::{MinifyErrors, PipelineConfig};
pub use error::{Error, PipelineError, Result, Stage};
pub use minify::Minifier;
pub use path::html_pathname;
pub use pipeline::{BatchReport, Pipeline};
pub use render::{Document, Template};
pub use title::{TitleExtractor, extract_title};
pub use typography::use_hair_spaces;
