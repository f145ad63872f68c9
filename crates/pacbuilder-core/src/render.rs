//! PAC rendering
//!
//! The PAC script is a Handlebars template. Variables available to it:
//! - `domains`: list of domain strings, in publish order
//! - `count`: number of domains
//! - `proxy`: proxy `host:port` returned for matching hosts

use crate::config::RenderConfig;
use crate::domain::Domain;
use crate::error::{Error, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// File name looked up inside a template directory
pub const TEMPLATE_NAME: &str = "proxy.pac.hbs";

const BUILTIN_TEMPLATE: &str = include_str!("../templates/proxy.pac.hbs");

/// Rendered PAC script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacDocument(String);

impl PacDocument {
    /// Script text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the script text
    pub fn into_string(self) -> String {
        self.0
    }

    /// Write the script verbatim to `path`
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.0)?;
        Ok(())
    }
}

impl fmt::Display for PacDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    domains: &'a [Domain],
    count: usize,
    proxy: &'a str,
}

/// Renders domain lists into PAC scripts
pub struct PacRenderer {
    registry: Handlebars<'static>,
    proxy: String,
}

impl fmt::Debug for PacRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacRenderer")
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

impl PacRenderer {
    /// Renderer using the template shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_source(BUILTIN_TEMPLATE)
    }

    /// Renderer using `proxy.pac.hbs` from `dir`
    pub fn from_template_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(TEMPLATE_NAME);
        if !path.is_file() {
            return Err(Error::TemplateNotFound {
                path: path.display().to_string(),
            });
        }
        let source = std::fs::read_to_string(&path)?;
        Self::from_source(&source)
    }

    /// Renderer from raw template source
    pub fn from_source(source: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_template_string(TEMPLATE_NAME, source)?;

        Ok(Self {
            registry,
            proxy: RenderConfig::default().proxy,
        })
    }

    /// Renderer for the configured template directory, or the built-in one
    pub fn from_config(template_dir: Option<&Path>, config: &RenderConfig) -> Result<Self> {
        let renderer = match template_dir {
            Some(dir) => Self::from_template_dir(dir)?,
            None => Self::builtin()?,
        };
        Ok(renderer.with_proxy(config.proxy.clone()))
    }

    /// Set the proxy `host:port`
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = proxy.into();
        self
    }

    /// Render `domains` in the given order
    pub fn render(&self, domains: &[Domain]) -> Result<PacDocument> {
        let context = TemplateContext {
            domains,
            count: domains.len(),
            proxy: &self.proxy,
        };

        let mut text = self.registry.render(TEMPLATE_NAME, &context)?;
        if !text.ends_with('\n') {
            text.push('\n');
        }

        Ok(PacDocument(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainGrammar;

    fn domains(names: &[&str]) -> Vec<Domain> {
        let grammar = DomainGrammar::default();
        names.iter().map(|n| grammar.parse(n).unwrap()).collect()
    }

    #[test]
    fn test_render_single_domain() {
        let pac = PacRenderer::builtin().unwrap().render(&domains(&["example.com"])).unwrap();
        let text = pac.as_str();

        assert!(text.contains("function FindProxyForURL(url, host)"));
        assert!(text.contains("\"example.com\"\n"));
        assert!(text.contains("\"DIRECT\""));
        assert!(text.contains("\"PROXY 127.0.0.1:1\""));
        assert!(text.contains("Domain count: 1"));
    }

    #[test]
    fn test_render_multiple_domains_in_order() {
        let pac = PacRenderer::builtin()
            .unwrap()
            .render(&domains(&["c.com", "a.com", "b.com"]))
            .unwrap();
        let text = pac.as_str();

        assert!(text.contains(
            "var allowed = [\n        \"c.com\",\n        \"a.com\",\n        \"b.com\"\n    ];"
        ));
        assert!(!text.contains("\"b.com\","));
        assert!(text.contains("Domain count: 3"));
    }

    #[test]
    fn test_render_no_domains() {
        let pac = PacRenderer::builtin().unwrap().render(&[]).unwrap();
        assert!(pac.as_str().contains("var allowed = [\n    ];"));
        assert!(pac.as_str().contains("Domain count: 0"));
    }

    #[test]
    fn test_render_ends_with_newline() {
        let pac = PacRenderer::builtin().unwrap().render(&domains(&["a.com"])).unwrap();
        assert!(pac.as_str().ends_with("}\n"));

        let custom = PacRenderer::from_source("{{count}}").unwrap().render(&[]).unwrap();
        assert_eq!(custom.as_str(), "0\n");
    }

    #[test]
    fn test_render_custom_proxy() {
        let pac = PacRenderer::builtin()
            .unwrap()
            .with_proxy("10.0.0.5:3128")
            .render(&domains(&["a.com"]))
            .unwrap();
        assert!(pac.as_str().contains("return \"PROXY 10.0.0.5:3128\";"));
    }

    #[test]
    fn test_template_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(TEMPLATE_NAME),
            "{{#each domains}}{{this}};{{/each}}{{proxy}}\n",
        )
        .unwrap();

        let pac = PacRenderer::from_template_dir(dir.path())
            .unwrap()
            .render(&domains(&["a.com", "b.com"]))
            .unwrap();
        assert_eq!(pac.as_str(), "a.com;b.com;127.0.0.1:1\n");
    }

    #[test]
    fn test_template_dir_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = PacRenderer::from_template_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound { .. }));
    }

    #[test]
    fn test_invalid_template() {
        assert!(matches!(
            PacRenderer::from_source("{{#each domains}}"),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn test_strict_mode_rejects_unknown_variables() {
        let renderer = PacRenderer::from_source("{{missing}}").unwrap();
        assert!(matches!(renderer.render(&[]), Err(Error::Render(_))));
    }
}
