// tests/resolve.rs

//! Recipe resolution against cookbooks: fetching, candidates, similarity,
//! pin routing.

mod common;

use buckaroo::process::Step;
use buckaroo::{
    Error, Event, FetchCause, PartialRecipeIdentifier, Process, Recipe, RecipeError,
    RecipeIdentifier, SourceRegistry,
};
use common::{TestCookbook, id};
use futures::StreamExt;
use std::fs;

#[test]
fn test_identifier_round_trip() {
    for text in ["boost/asio", "madler/zlib@official", "a-b/c_d.e@f1"] {
        let identifier = id(text);
        assert_eq!(identifier.encode(), text);
        assert_eq!(RecipeIdentifier::parse(&identifier.encode()).unwrap(), identifier);
    }

    for text in ["asio", "boost/asio"] {
        let partial = PartialRecipeIdentifier::parse(text).unwrap();
        assert_eq!(PartialRecipeIdentifier::parse(&partial.encode()).unwrap(), partial);
    }
}

#[tokio::test]
async fn test_fetch_matches_file_on_disk() {
    let cookbook = TestCookbook::new("official").with_recipe("boost/asio", &["1.10.8", "1.11.0"]);

    let recipe = cookbook.source().fetch(&id("boost/asio")).result().await.unwrap();

    let on_disk = fs::read_to_string(cookbook.recipe_path("boost/asio")).unwrap();
    assert_eq!(recipe, Recipe::parse(&on_disk).unwrap());
    assert_eq!(recipe.version_names().collect::<Vec<_>>(), ["1.10.8", "1.11.0"]);
}

#[tokio::test]
async fn test_fetch_reports_progress_in_order() {
    let cookbook = TestCookbook::new("official").with_recipe("boost/asio", &["1.0.0"]);

    let steps: Vec<_> = cookbook
        .source()
        .fetch(&id("boost/asio"))
        .start()
        .map(|step| step.unwrap())
        .collect()
        .await;

    assert_eq!(steps.len(), 4);
    assert!(matches!(&steps[0], Step::Progress(Event::FetchStarted { .. })));
    assert!(matches!(&steps[1], Step::Progress(Event::FileRead { bytes, .. }) if *bytes > 0));
    assert!(matches!(
        &steps[2],
        Step::Progress(Event::RecipeFetched { versions: 1, .. })
    ));
    assert!(matches!(&steps[3], Step::Done(recipe) if recipe.name == "asio"));
}

#[tokio::test]
async fn test_fetch_unknown_is_not_found() {
    let cookbook = TestCookbook::new("official").with_recipe("boost/asio", &["1.0.0"]);
    let source = cookbook.source();

    let err = source.fetch(&id("boost/beast")).result().await.unwrap_err();
    match err {
        Error::RecipeError(RecipeError::NotFound { origin, identifier }) => {
            assert_eq!(identifier, id("boost/beast"));
            assert_eq!(origin.name(), &cookbook.name);
            assert_eq!(origin.to_string(), source.to_string());
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_recipe_is_a_fetch_error() {
    let cookbook = TestCookbook::new("official").with_raw("boost/asio", "{ \"name\": ");

    let err = cookbook.source().fetch(&id("boost/asio")).result().await.unwrap_err();
    assert!(matches!(
        err,
        Error::RecipeError(RecipeError::Fetch {
            cause: FetchCause::Malformed(_),
            ..
        })
    ));
}

#[tokio::test]
async fn test_pin_to_other_source_is_rejected() {
    let cookbook = TestCookbook::new("main-source").with_recipe("a/x", &["1.0.0"]);

    let err = cookbook
        .source()
        .fetch(&id("a/x@other-source"))
        .result()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::RecipeError(RecipeError::SourceMismatch { ref pinned, .. }) if pinned.as_str() == "other-source"
    ));

    // Pinning to the cookbook's own name is fine
    let recipe = cookbook.source().fetch(&id("a/x@main-source")).result().await;
    assert!(recipe.is_ok());
}

#[tokio::test]
async fn test_candidates_match_recipe_name() {
    let cookbook = TestCookbook::new("official")
        .with_recipe("a/x", &["1.0.0"])
        .with_recipe("b/x", &["1.0.0"])
        .with_recipe("a/y", &["1.0.0"]);
    let source = cookbook.source();

    let mut any = source
        .find_candidates(&PartialRecipeIdentifier::parse("x").unwrap())
        .await;
    any.sort();
    assert_eq!(any, vec![id("a/x"), id("b/x")]);

    let scoped = source
        .find_candidates(&PartialRecipeIdentifier::parse("b/x").unwrap())
        .await;
    assert_eq!(scoped, vec![id("b/x")]);
}

#[tokio::test]
async fn test_similar_orders_by_edit_distance() {
    let cookbook = TestCookbook::new("official")
        .with_recipe("o/boast", &["1.0.0"])
        .with_recipe("o/boost", &["1.0.0"])
        .with_recipe("o/boots", &["1.0.0"])
        .with_recipe("o/zlib", &["1.0.0"]);

    let similar = cookbook.source().find_similar(&id("o/boot")).await;

    let position = |name: &str| similar.iter().position(|s| *s == id(name)).unwrap();
    assert!(position("o/boots") < position("o/boast"));
    assert!(position("o/boost") < position("o/boast"));
    assert_eq!(similar.last(), Some(&id("o/zlib")));
}

#[tokio::test]
async fn test_searches_are_best_effort() {
    let cookbook = TestCookbook::new("official");
    // No recipes directory at all
    let source = cookbook.source();

    assert!(source.find_candidates(&PartialRecipeIdentifier::parse("x").unwrap()).await.is_empty());
    assert!(source.find_similar(&id("a/x")).await.is_empty());
}

#[test]
fn test_sources_equal_by_root() {
    let cookbook = TestCookbook::new("official");
    let a = buckaroo::LazyCookbookSource::new(cookbook.name.clone(), cookbook.root());
    let b = buckaroo::LazyCookbookSource::new(
        buckaroo::Identifier::parse("renamed").unwrap(),
        cookbook.root(),
    );
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_registry_routes_and_joins() {
    let main = TestCookbook::new("main").with_recipe("a/x", &["1.0.0"]);
    let extra = TestCookbook::new("extra").with_recipe("b/y", &["2.0.0", "2.1.0"]);

    let registry = SourceRegistry::new(main.source())
        .with_source(extra.source())
        .unwrap();

    let both = Process::join_all(vec![
        registry.fetch(&id("a/x")),
        registry.fetch(&id("b/y@extra")),
    ])
    .result()
    .await
    .unwrap();
    assert_eq!(both[0].name, "x");
    assert_eq!(both[1].versions.len(), 2);

    // Unpinned identifiers only go to the default source
    let err = registry.fetch(&id("b/y")).result().await.unwrap_err();
    assert!(matches!(err, Error::RecipeError(RecipeError::NotFound { .. })));
}
