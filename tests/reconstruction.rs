use html_placeholders::html::placeholder_for;
use html_placeholders::{
    Command, Config, ExtractOptions, ReconstructOptions, TextMap, extract_html, reconstruct_html,
    run,
};
use kuchiki::traits::*;

fn normalized(html: &str) -> String {
    let document = kuchiki::parse_html().one(html);
    let mut buffer = Vec::new();
    document.serialize(&mut buffer).expect("serialize");
    String::from_utf8(buffer).expect("utf8")
}

#[test]
fn identity_map_restores_equivalent_markup() {
    let pages = [
        "<div><p>Hello <b>World</b></p></div>",
        r#"<p>Call <a href="/contact" title="Reach us">us</a> today &amp; tomorrow</p>"#,
        concat!(
            "<!DOCTYPE html><html><head><title>Title</title>",
            r#"<meta name="description" content="Site info"></head>"#,
            r#"<body><img alt="a &quot;quote&quot;" src="/a.png"><pre> keep  </pre>"#,
            r#"<p class="no-translate">Skip</p><p>  spaced  </p></body></html>"#
        ),
    ];
    for page in pages {
        let result = extract_html(page, &ExtractOptions::default()).expect("extract");
        let options = ReconstructOptions::default();
        let restored = reconstruct_html(&result.modified_html, &result.text_map, &options);
        assert_eq!(normalized(&restored), normalized(page), "{page}");
    }
}

#[test]
fn translated_map_lands_in_place() {
    let result = extract_html(
        r#"<p>Hello world</p><img alt="Title">"#,
        &ExtractOptions::default(),
    )
    .expect("extract");
    let translated: TextMap = [
        (placeholder_for("Hello world"), "Bonjour le monde".to_string()),
        (placeholder_for("Title"), "Titre".to_string()),
    ]
    .into_iter()
    .collect();
    let restored = reconstruct_html(
        &result.modified_html,
        &translated,
        &ReconstructOptions::default(),
    );
    insta::assert_snapshot!(restored, @r#"<p>Bonjour le monde</p><img alt="Titre">"#);
}

#[test]
fn partial_map_leaves_tokens_for_a_later_pass() {
    let result =
        extract_html("<p>Hello</p><p>World</p>", &ExtractOptions::default()).expect("extract");
    let hello = placeholder_for("Hello");
    let world = placeholder_for("World");
    let partial: TextMap = [(hello.clone(), "Hallo".to_string())].into_iter().collect();
    let first = reconstruct_html(&result.modified_html, &partial, &ReconstructOptions::default());
    assert_eq!(first, format!("<p>Hallo</p><p>{}</p>", world));

    let rest: TextMap = [(world, "Welt".to_string())].into_iter().collect();
    let second = reconstruct_html(&first, &rest, &ReconstructOptions::default());
    assert_eq!(second, "<p>Hallo</p><p>Welt</p>");
}

#[test]
fn full_document_gets_language_and_direction() {
    let page = "<!DOCTYPE html><html><head><title>Hello</title></head><body><p>World</p></body></html>";
    let result = extract_html(page, &ExtractOptions::default()).expect("extract");
    let restored = reconstruct_html(
        &result.modified_html,
        &result.text_map,
        &ReconstructOptions::for_language("fa"),
    );
    assert!(restored.starts_with(r#"<!DOCTYPE html><html lang="fa" dir="rtl"><head>"#));
    assert!(restored.contains("<title>Hello</title>"));
    assert!(restored.contains("<p>World</p>"));
}

#[test]
fn run_drives_extract_missing_and_reconstruct() {
    let page = "<html><head></head><body><p>Hello</p><p>World</p></body></html>".to_string();
    let extraction = run(
        Config {
            command: Command::Extract {
                excluded_selectors: Vec::new(),
                with_context: false,
            },
            settings_path: None,
        },
        page,
    )
    .expect("extract");
    let parsed: serde_json::Value = serde_json::from_str(&extraction).expect("json");
    assert_eq!(parsed["textMap"].as_object().map(|map| map.len()), Some(2));

    let hola: TextMap = [(placeholder_for("Hello"), "Hola".to_string())]
        .into_iter()
        .collect();
    let translations = serde_json::to_string(&hola).expect("translations json");
    let missing = run(
        Config {
            command: Command::Missing {
                translations: translations.clone(),
            },
            settings_path: None,
        },
        extraction.clone(),
    )
    .expect("missing");
    let missing: Vec<String> = serde_json::from_str(&missing).expect("missing json");
    assert_eq!(missing, vec![placeholder_for("World")]);

    let html = run(
        Config {
            command: Command::Reconstruct {
                translations,
                language: Some("es".to_string()),
            },
            settings_path: None,
        },
        extraction,
    )
    .expect("reconstruct");
    assert!(html.contains(r#"<html lang="es" dir="ltr">"#));
    assert!(html.contains("<p>Hola</p>"));
    assert!(html.contains(&placeholder_for("World")));
}

#[test]
fn run_rejects_empty_input() {
    let err = run(
        Config {
            command: Command::Extract {
                excluded_selectors: Vec::new(),
                with_context: false,
            },
            settings_path: None,
        },
        "   ".to_string(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("input is empty"));
}

fn round_trip(page: &str) -> String {
    let result = extract_html(page, &ExtractOptions::default()).expect("extract");
    reconstruct_html(
        &result.modified_html,
        &result.text_map,
        &ReconstructOptions::default(),
    )
}

#[test]
fn escaped_markup_text_and_real_markup_get_distinct_placeholders() {
    let page = "<div><p><b>x</b> y</p><p>&lt;b&gt;x&lt;/b&gt; y</p></div>";
    let result = extract_html(page, &ExtractOptions::default()).expect("extract");
    assert_eq!(result.text_map.len(), 2);
    assert!(result.text_map.contains_key(&placeholder_for("<b>x</b> y")));
    assert!(result.text_map.contains_key(&placeholder_for("&lt;b&gt;x&lt;/b&gt; y")));
    assert_eq!(round_trip(page), page);
}

#[test]
fn fragments_with_header_stay_fragments() {
    let page = "<header><p>Hi</p></header>";
    assert_eq!(round_trip(page), page);
}

#[test]
fn fragment_comments_outside_body_survive() {
    let page = "<!-- keep --><p>Hi</p>";
    let result = extract_html(page, &ExtractOptions::default()).expect("extract");
    assert_eq!(
        result.modified_html,
        format!("<!-- keep --><p>{}</p>", placeholder_for("Hi"))
    );
    assert_eq!(round_trip(page), page);
}
