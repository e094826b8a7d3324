//! The document generation pipeline.
//!
//! Each input file moves through the same stages: it is read whole, its title
//! is extracted and the template rendered, the rendering is minified, the
//! output path is resolved, and the result is written atomically. A failure
//! at any stage is scoped to that file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::{MinifyErrors, PipelineConfig};
use crate::error::{Error, PipelineError, Result, Stage};
use crate::minify::{HTML_MEDIA_TYPE, Minifier};
use crate::path::html_pathname;
use crate::render::{Document, Template};
use crate::title::{TitleExtractor, decode_content};
use crate::typography::use_hair_spaces;

/// Turns content files into complete, minified documents.
#[derive(Debug)]
pub struct Pipeline {
    template: Template,
    minifier: Arc<Minifier>,
    titles: TitleExtractor,
    config: PipelineConfig,
}

/// Outcome of [`Pipeline::run`].
#[derive(Debug, Default)]
pub struct BatchReport {
    /// `(input, output)` for every file written.
    pub written: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<PipelineError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of files attempted.
    pub fn len(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Pipeline {
    /// Create a pipeline.
    ///
    /// Fails with [`Error::Parse`] if the configured title selector is invalid.
    pub fn new(template: Template, minifier: Arc<Minifier>, config: PipelineConfig) -> Result<Self> {
        let titles = TitleExtractor::new(&config.title_selector)?;
        Ok(Self {
            template,
            minifier,
            titles,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn minifier(&self) -> &Arc<Minifier> {
        &self.minifier
    }

    /// Render `content` into `writer`, unminified.
    pub fn generate_document<W: Write>(&self, content: &str, writer: W) -> Result<()> {
        let content = if self.config.hair_spaces {
            use_hair_spaces(content)
        } else {
            content.into()
        };

        let title = self.titles.extract(&content)?;
        debug!("title {title:?}");
        self.template.render(&Document::new(title, content), writer)
    }

    /// Generate the minified document for the file at `path` into `writer`.
    pub fn generate_html<W: Write>(&self, path: impl AsRef<Path>, mut writer: W) -> std::result::Result<(), PipelineError> {
        let path = path.as_ref();
        let html = self.build(path)?;
        writer
            .write_all(&html)
            .map_err(|e| PipelineError::new(path, Stage::Write, e.into()))
    }

    /// Generate the document for the file at `path` and write it to the
    /// derived output path, which is returned.
    ///
    /// The output directory is created if needed. Bytes go to a temporary file
    /// next to the output which is synced and then renamed into place, so the
    /// output path only ever holds a complete document.
    pub fn generate_html_file(&self, path: impl AsRef<Path>) -> std::result::Result<PathBuf, PipelineError> {
        let path = path.as_ref();
        let html = self.build(path)?;

        let output = html_pathname(path, &self.config.output_dir)
            .map_err(|e| PipelineError::new(path, Stage::Resolve, e))?;
        debug!("{}: resolved output {}", path.display(), output.display());

        write_atomic(&output, &html).map_err(|e| PipelineError::new(path, Stage::Write, e.into()))?;
        info!("wrote {}", output.display());
        Ok(output)
    }

    /// Generate every file in `paths`, in order.
    ///
    /// A failing file is logged and recorded; it never stops the batch.
    pub fn run<I, P>(&self, paths: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BatchReport::default();
        for path in paths {
            let path = path.as_ref();
            match self.generate_html_file(path) {
                Ok(output) => report.written.push((path.to_path_buf(), output)),
                Err(e) => {
                    debug!("{}: failed at {} stage", e.path.display(), e.stage);
                    report.failed.push(e);
                }
            }
        }
        report
    }

    /// Read, render and minify.
    fn build(&self, path: &Path) -> std::result::Result<Vec<u8>, PipelineError> {
        let raw = fs::read(path).map_err(|e| PipelineError::new(path, Stage::Read, e.into()))?;
        debug!("{}: read {} bytes", path.display(), raw.len());

        let mut rendered = Vec::with_capacity(raw.len());
        decode_content(&raw)
            .and_then(|content| self.generate_document(&content, &mut rendered))
            .map_err(|e| PipelineError::new(path, Stage::Render, e))?;
        debug!("{}: rendered {} bytes", path.display(), rendered.len());

        match self.minifier.minify(HTML_MEDIA_TYPE, &rendered) {
            Ok(minified) => {
                debug!("{}: minified to {} bytes", path.display(), minified.len());
                Ok(minified)
            }
            Err(e) => self.minify_failed(path, rendered, e),
        }
    }

    fn minify_failed(&self, path: &Path, rendered: Vec<u8>, e: Error) -> std::result::Result<Vec<u8>, PipelineError> {
        match self.config.minify_errors {
            MinifyErrors::Fail => Err(PipelineError::new(path, Stage::Minify, e)),
            MinifyErrors::PassThrough => {
                warn!("{}: {e}; keeping unminified output", path.display());
                Ok(rendered)
            }
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".content2html-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }

    let mut file = builder.tempfile_in(dir)?;
    file.as_file_mut().write_all(bytes)?;
    file.as_file_mut().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<!DOCTYPE html><html><head><title>{{Title}}</title></head><body>{{{Body}}}</body></html>";

    fn pipeline(config: PipelineConfig) -> Pipeline {
        let template = Template::from_source(TEMPLATE).unwrap();
        Pipeline::new(template, Arc::new(Minifier::standard()), config).unwrap()
    }

    #[test]
    fn test_generate_document_unminified() {
        let mut out = Vec::new();
        pipeline(PipelineConfig::default())
            .generate_document("<h1>Fish &amp; Chips</h1>\n<p>Text</p>", &mut out)
            .unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("<title>Fish &amp; Chips</title>"), "{html}");
        assert!(html.contains("<body><h1>Fish &amp; Chips</h1>\n<p>Text</p></body>"));
    }

    #[test]
    fn test_generate_document_hair_spaces() {
        let mut out = Vec::new();
        pipeline(PipelineConfig::default().with_hair_spaces(true))
            .generate_document("<h1>Before — after</h1>", &mut out)
            .unwrap();
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("<title>Before\u{200A}—\u{200A}after</title>"), "{html}");
    }

    #[test]
    fn test_generate_document_missing_heading() {
        let err = pipeline(PipelineConfig::default())
            .generate_document("<p>no heading</p>", Vec::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingHeading));
    }

    #[test]
    fn test_custom_title_selector() {
        let mut out = Vec::new();
        pipeline(PipelineConfig::default().with_title_selector("h2.title"))
            .generate_document("<h1>Site</h1><h2 class=\"title\">Page</h2>", &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("<title>Page</title>"));
    }

    #[test]
    fn test_invalid_title_selector() {
        let template = Template::from_source(TEMPLATE).unwrap();
        let config = PipelineConfig::default().with_title_selector("h1[");
        let err = Pipeline::new(template, Arc::new(Minifier::standard()), config).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    fn failing_minifier() -> Arc<Minifier> {
        let mut minifier = Minifier::new();
        minifier.add_func(HTML_MEDIA_TYPE, |media_type, _| Err(Error::minify(media_type, "rejected")));
        Arc::new(minifier)
    }

    #[test]
    fn test_minify_failure_policy() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.content");
        fs::write(&input, "<h1>T</h1>").unwrap();

        let template = Template::from_source("{{{Body}}}").unwrap();
        let failing = Pipeline::new(template, failing_minifier(), PipelineConfig::default()).unwrap();
        let err = failing.generate_html(&input, Vec::new()).unwrap_err();
        assert_eq!(err.stage, Stage::Minify);
        assert!(matches!(err.source, Error::Minify { .. }));

        let template = Template::from_source("{{{Body}}}").unwrap();
        let config = PipelineConfig::default().with_minify_errors(MinifyErrors::PassThrough);
        let passing = Pipeline::new(template, failing_minifier(), config).unwrap();
        let mut out = Vec::new();
        passing.generate_html(&input, &mut out).unwrap();
        assert_eq!(out, b"<h1>T</h1>");
    }

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/page.html");
        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"second");

        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("page.html")]);
    }
}
