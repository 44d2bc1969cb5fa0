use clap::Parser;
use tomgpt_cli::{Args, Provider, Variant};

#[test]
fn defaults_match_the_hosted_app() {
    let args = Args::try_parse_from(["tomgpt"]).unwrap();

    assert_eq!(args.variant, Variant::Base);
    assert_eq!(args.provider, Provider::Cohere);
    assert_eq!(args.max_iterations, 15);
    assert_eq!(args.pinecone_index, "tom-gpt-doc");
    assert!(args.model.is_none());
    assert!(!args.no_stream);
    assert_eq!(args.log_filter(), "warn");
}

#[test]
fn flags_override_defaults() {
    let args = Args::try_parse_from([
        "tomgpt",
        "--variant",
        "rag",
        "--provider",
        "ollama",
        "--model",
        "mistral",
        "--max-iterations",
        "5",
        "--collection",
        "manual-vol-1",
        "--no-stream",
        "--verbose",
    ])
    .unwrap();

    assert_eq!(args.variant, Variant::Rag);
    assert_eq!(args.provider, Provider::Ollama);
    assert_eq!(args.model.as_deref(), Some("mistral"));
    assert_eq!(args.max_iterations, 5);
    assert_eq!(args.collection, vec!["manual-vol-1".to_string()]);
    assert!(args.no_stream);
    assert_eq!(args.log_filter(), "warn,tomgpt=debug");
}

#[test]
fn unknown_variant_is_rejected() {
    assert!(Args::try_parse_from(["tomgpt", "--variant", "pro"]).is_err());
}

#[test]
fn collection_flag_repeats() {
    let args = Args::try_parse_from([
        "tomgpt",
        "--collection",
        "manual-vol-1",
        "--collection",
        "manual-vol-2",
    ])
    .unwrap();
    assert_eq!(args.collection, vec!["manual-vol-1", "manual-vol-2"]);

    let args = Args::try_parse_from(["tomgpt"]).unwrap();
    assert!(args.collection.is_empty());
}
