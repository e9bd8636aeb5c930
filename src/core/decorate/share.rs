//! Social share links and embed markup
//!
//! All decorators here derive from the published `index-html` URL and, where
//! the target network shows a caption, from `export.title`.

use super::{addition, encode_component, export_field, string_field, DecorationError, ResultDecorator};
use crate::config::ShareConfig;
use crate::domain::{ExportResult, INDEX_HTML};

/// Adds `twitter-url`, a tweet intent linking to the published map
#[derive(Debug, Clone, Copy, Default)]
pub struct TwitterIntentDecorator;

impl ResultDecorator for TwitterIntentDecorator {
    fn name(&self) -> &'static str {
        "twitter"
    }

    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError> {
        let title = export_field(result, "title")?;
        let index_html = string_field(result, INDEX_HTML)?;

        Ok(addition(
            "twitter-url",
            format!(
                "https://twitter.com/intent/tweet?text={}&url={}&source=mindmup.com&related=mindmup&via=mindmup",
                encode_component(title),
                encode_component(index_html)
            ),
        ))
    }
}

/// Adds `facebook-url`, a share dialog for the configured application
#[derive(Debug, Clone)]
pub struct FacebookShareDecorator {
    app_id: String,
    redirect_uri: String,
}

impl FacebookShareDecorator {
    pub fn new(app_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Decorator for the `[share]` section, if an application id is configured
    pub fn from_config(config: &ShareConfig) -> Option<Self> {
        config
            .facebook_app_id
            .as_ref()
            .map(|app_id| Self::new(app_id.clone(), config.facebook_redirect_uri.clone()))
    }
}

impl ResultDecorator for FacebookShareDecorator {
    fn name(&self) -> &'static str {
        "facebook"
    }

    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError> {
        let index_html = string_field(result, INDEX_HTML)?;

        Ok(addition(
            "facebook-url",
            format!(
                "https://www.facebook.com/dialog/share?app_id={}&href={}&redirect_uri={}",
                encode_component(&self.app_id),
                encode_component(index_html),
                encode_component(&self.redirect_uri)
            ),
        ))
    }
}

/// Adds `linkedin-url`
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedInShareDecorator;

impl ResultDecorator for LinkedInShareDecorator {
    fn name(&self) -> &'static str {
        "linkedin"
    }

    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError> {
        let title = export_field(result, "title")?;
        let index_html = string_field(result, INDEX_HTML)?;
        let summary = export_field(result, "description").unwrap_or_default();

        Ok(addition(
            "linkedin-url",
            format!(
                "https://www.linkedin.com/shareArticle?mini=true&url={}&title={}&summary={}&source=MindMup",
                encode_component(index_html),
                encode_component(title),
                encode_component(summary)
            ),
        ))
    }
}

/// Adds `tumblr-url`
#[derive(Debug, Clone, Copy, Default)]
pub struct TumblrShareDecorator;

impl ResultDecorator for TumblrShareDecorator {
    fn name(&self) -> &'static str {
        "tumblr"
    }

    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError> {
        let title = export_field(result, "title")?;
        let index_html = string_field(result, INDEX_HTML)?;
        let description = export_field(result, "description").unwrap_or_default();

        Ok(addition(
            "tumblr-url",
            format!(
                "https://www.tumblr.com/share/link?url={}&name={}&description={}",
                encode_component(index_html),
                encode_component(title),
                encode_component(description)
            ),
        ))
    }
}

/// Adds `embed-markup`, an iframe showing the published map
#[derive(Debug, Clone, Copy)]
pub struct EmbedMarkupDecorator {
    height: u32,
}

impl EmbedMarkupDecorator {
    pub fn new(height: u32) -> Self {
        Self { height }
    }
}

impl Default for EmbedMarkupDecorator {
    fn default() -> Self {
        Self::new(600)
    }
}

impl ResultDecorator for EmbedMarkupDecorator {
    fn name(&self) -> &'static str {
        "embed"
    }

    fn decorate(&self, result: &ExportResult) -> Result<ExportResult, DecorationError> {
        let index_html = string_field(result, INDEX_HTML)?;

        Ok(addition(
            "embed-markup",
            format!(
                r#"<iframe src="{}" width="100%" height="{}" frameborder="0"></iframe>"#,
                escape_attribute(index_html),
                self.height
            ),
        ))
    }
}

fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn published() -> ExportResult {
        json!({
            "output-url": "https://out/F1",
            "index-html": "http://x",
            "export": {"title": "T", "description": "Plans & ideas"}
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_twitter_intent() {
        let result = json!({"export": {"title": "T"}, "index-html": "http://x"});
        let additions = TwitterIntentDecorator
            .decorate(result.as_object().unwrap())
            .unwrap();

        assert_eq!(
            additions["twitter-url"],
            json!("https://twitter.com/intent/tweet?text=T&url=http%3A%2F%2Fx&source=mindmup.com&related=mindmup&via=mindmup")
        );
    }

    #[test]
    fn test_twitter_encodes_title() {
        let mut result = published();
        result.insert("export".into(), json!({"title": "Q&A plan"}));

        let additions = TwitterIntentDecorator.decorate(&result).unwrap();
        let url = additions["twitter-url"].as_str().unwrap();

        assert!(url.contains("text=Q%26A%20plan&"));
    }

    #[test]
    fn test_facebook_uses_app_id() {
        let decorator = FacebookShareDecorator::new("1234", "https://app/done");
        let additions = decorator.decorate(&published()).unwrap();

        assert_eq!(
            additions["facebook-url"],
            json!("https://www.facebook.com/dialog/share?app_id=1234&href=http%3A%2F%2Fx&redirect_uri=https%3A%2F%2Fapp%2Fdone")
        );
    }

    #[test]
    fn test_facebook_from_config_requires_app_id() {
        let mut config = ShareConfig::default();
        assert!(FacebookShareDecorator::from_config(&config).is_none());

        config.facebook_app_id = Some("1234".into());
        assert!(FacebookShareDecorator::from_config(&config).is_some());
    }

    #[test]
    fn test_linkedin_includes_summary() {
        let additions = LinkedInShareDecorator.decorate(&published()).unwrap();
        let url = additions["linkedin-url"].as_str().unwrap();

        assert!(url.starts_with("https://www.linkedin.com/shareArticle?mini=true&url=http%3A%2F%2Fx"));
        assert!(url.contains("&summary=Plans%20%26%20ideas"));
    }

    #[test]
    fn test_embed_markup_escapes_url() {
        let mut result = published();
        result.insert("index-html".into(), json!("http://x/?a=1&b=\"2\""));

        let additions = EmbedMarkupDecorator::default().decorate(&result).unwrap();

        assert_eq!(
            additions["embed-markup"],
            json!(r#"<iframe src="http://x/?a=1&amp;b=&quot;2&quot;" width="100%" height="600" frameborder="0"></iframe>"#)
        );
    }

    #[test_case(&TwitterIntentDecorator as &dyn ResultDecorator ; "twitter")]
    #[test_case(&LinkedInShareDecorator as &dyn ResultDecorator ; "linkedin")]
    #[test_case(&TumblrShareDecorator as &dyn ResultDecorator ; "tumblr")]
    #[test_case(&EmbedMarkupDecorator::default() as &dyn ResultDecorator ; "embed")]
    fn test_missing_index_html_is_an_error(decorator: &dyn ResultDecorator) {
        let mut result = published();
        result.remove("index-html");

        assert_eq!(
            decorator.decorate(&result),
            Err(DecorationError::MissingField("index-html".into()))
        );
    }

    #[test]
    fn test_title_must_be_a_string() {
        let mut result = published();
        result.insert("export".into(), json!({"title": Value::Null}));

        assert_eq!(
            TwitterIntentDecorator.decorate(&result),
            Err(DecorationError::MissingField("export.title".into()))
        );
    }
}
