use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::html::{
    ExtractOptions, HtmlExtractor, HtmlParser, ReconstructOptions, TextMap, reconstruct_html,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderDocument {
    pub placeholders: TextMap,
    pub content_with_placeholders: String,
}

/// Two-step contract every document type follows: swap translatable text for
/// placeholders, then swap translations back in.
pub trait PlaceholderHandler {
    fn insert_placeholders(&self, raw_content: &str) -> Result<PlaceholderDocument>;

    fn replace_placeholders(
        &self,
        content_with_placeholders: &str,
        translated_placeholders: &TextMap,
    ) -> Result<String>;
}

pub struct HtmlHandler<P: HtmlParser> {
    extractor: HtmlExtractor<P>,
    reconstruct: ReconstructOptions,
}

impl HtmlHandler<crate::html::Html5everParser> {
    pub fn new(extract: ExtractOptions, reconstruct: ReconstructOptions) -> Self {
        Self {
            extractor: HtmlExtractor::new(extract),
            reconstruct,
        }
    }
}

impl<P: HtmlParser> HtmlHandler<P> {
    pub fn with_parser(parser: P, extract: ExtractOptions, reconstruct: ReconstructOptions) -> Self {
        Self {
            extractor: HtmlExtractor::with_parser(parser, extract),
            reconstruct,
        }
    }

    pub fn extractor(&self) -> &HtmlExtractor<P> {
        &self.extractor
    }
}

impl<P: HtmlParser> PlaceholderHandler for HtmlHandler<P> {
    fn insert_placeholders(&self, raw_content: &str) -> Result<PlaceholderDocument> {
        let result = self.extractor.extract(raw_content)?;
        Ok(PlaceholderDocument {
            placeholders: result.text_map,
            content_with_placeholders: result.modified_html,
        })
    }

    fn replace_placeholders(
        &self,
        content_with_placeholders: &str,
        translated_placeholders: &TextMap,
    ) -> Result<String> {
        Ok(reconstruct_html(
            content_with_placeholders,
            translated_placeholders,
            &self.reconstruct,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use kuchiki::NodeRef;

    struct UnavailableParser;

    impl HtmlParser for UnavailableParser {
        fn parse(&self, _html: &str) -> Result<NodeRef> {
            Err(anyhow!("no DOM implementation available"))
        }
    }

    #[test]
    fn html_handler_round_trips_through_trait() {
        let handler = HtmlHandler::new(ExtractOptions::default(), ReconstructOptions::default());
        let handler: &dyn PlaceholderHandler = &handler;
        let doc = handler
            .insert_placeholders("<p>Hello <b>World</b></p><p>Bye</p>")
            .expect("insert");
        assert_eq!(doc.placeholders.len(), 2);
        let restored = handler
            .replace_placeholders(&doc.content_with_placeholders, &doc.placeholders)
            .expect("replace");
        assert_eq!(restored, "<p>Hello <b>World</b></p><p>Bye</p>");
    }

    #[test]
    fn parser_failure_is_surfaced() {
        let handler = HtmlHandler::with_parser(
            UnavailableParser,
            ExtractOptions::default(),
            ReconstructOptions::default(),
        );
        let err = handler.insert_placeholders("<p>x</p>").unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("failed to build html document"));
        assert!(message.contains("no DOM implementation available"));
    }
}
